//! Attribute transitions: plans of string tweens advanced by a scheduler.
//!
//! A render never animates on its own. It writes start values, builds a [`TransitionPlan`] and
//! hands it to whatever [`Scheduler`] the caller supplied. [`Timeline`] is a manual clock that
//! keeps one plan per owner and steps them on demand.

use crate::dom::{NodeId, SvgElement};
use line_chunked_core::fmt::js_number_with;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    QuadInOut,
    #[default]
    CubicInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t / 2.0
                } else {
                    let t = t - 1.0;
                    (t * (2.0 - t) + 1.0) / 2.0
                }
            }
            Ease::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub ease: Ease,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            delay: Duration::ZERO,
            ease: Ease::default(),
        }
    }
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Zero-duration transitions are applied synchronously by the render adapter.
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Eased progress at `elapsed`, or `None` while the delay has not run out.
    pub fn progress(&self, elapsed: Duration) -> Option<f64> {
        let active = elapsed.checked_sub(self.delay)?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let t = active.as_nanos() as f64 / self.duration.as_nanos() as f64;
        Some(self.ease.apply(t.min(1.0)))
    }
}

/// One attribute moving from `from` to `to` on `node`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub node: NodeId,
    pub attr: String,
    pub from: String,
    pub to: String,
}

/// Render counter shared between a binding and the plans it scheduled.
///
/// Every render bumps it, so a plan stamped with an older value no longer touches the tree.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Advances the counter and returns the new value.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl PartialEq for Generation {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    /// Binding that produced the plan; a newer plan from the same owner supersedes it.
    pub owner: u64,
    pub transition: Transition,
    pub tweens: Vec<Tween>,
    /// Nodes removed once the plan completes.
    pub removals: Vec<NodeId>,
    stamp: Option<(Generation, u64)>,
}

impl TransitionPlan {
    pub fn new(owner: u64, transition: Transition) -> Self {
        Self {
            owner,
            transition,
            tweens: Vec::new(),
            removals: Vec::new(),
            stamp: None,
        }
    }

    /// Ties the plan to the render that built it; it goes stale once `generation` moves past
    /// `value`.
    pub fn stamped(mut self, generation: Generation, value: u64) -> Self {
        self.stamp = Some((generation, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty() && self.removals.is_empty()
    }

    /// `false` once the owner has rendered again.
    pub fn is_current(&self) -> bool {
        self.stamp
            .as_ref()
            .is_none_or(|(generation, value)| generation.current() == *value)
    }

    /// Writes the frame at `elapsed` into `root`. Returns `true` once the plan is complete.
    ///
    /// A stale plan writes nothing and reports itself complete.
    pub fn apply(&self, root: &mut SvgElement, elapsed: Duration) -> bool {
        if !self.is_current() {
            return true;
        }
        let Some(t) = self.transition.progress(elapsed) else {
            return false;
        };
        let done = elapsed >= self.transition.delay + self.transition.duration;
        if done {
            self.finish(root);
            return true;
        }
        for tween in &self.tweens {
            if let Some(node) = root.find_mut(tween.node) {
                node.set_attr(tween.attr.clone(), interpolate_string(&tween.from, &tween.to, t));
            }
        }
        false
    }

    /// Jumps to the end state. Does nothing for a stale plan.
    pub fn finish(&self, root: &mut SvgElement) {
        if !self.is_current() {
            return;
        }
        for tween in &self.tweens {
            if let Some(node) = root.find_mut(tween.node) {
                node.set_attr(tween.attr.clone(), tween.to.clone());
            }
        }
        for id in &self.removals {
            root.remove(*id);
        }
    }
}

pub trait Scheduler {
    fn schedule(&mut self, plan: TransitionPlan);
}

/// What a render needs to animate instead of applying geometry immediately.
pub struct TransitionContext<'a> {
    pub transition: Transition,
    scheduler: &'a mut dyn Scheduler,
}

impl<'a> TransitionContext<'a> {
    pub fn new(transition: Transition, scheduler: &'a mut dyn Scheduler) -> Self {
        Self {
            transition,
            scheduler,
        }
    }

    pub(crate) fn schedule(&mut self, plan: TransitionPlan) {
        self.scheduler.schedule(plan);
    }
}

impl std::fmt::Debug for TransitionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionContext")
            .field("transition", &self.transition)
            .finish_non_exhaustive()
    }
}

/// Manually clocked scheduler.
#[derive(Debug, Default)]
pub struct Timeline {
    active: Vec<(TransitionPlan, Duration)>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Moves every plan forward by `dt`, dropping the ones that completed.
    pub fn advance(&mut self, root: &mut SvgElement, dt: Duration) {
        self.active.retain_mut(|(plan, elapsed)| {
            *elapsed += dt;
            !plan.apply(root, *elapsed)
        });
    }

    pub fn finish_all(&mut self, root: &mut SvgElement) {
        for (plan, _) in self.active.drain(..) {
            plan.finish(root);
        }
    }
}

impl Scheduler for Timeline {
    fn schedule(&mut self, plan: TransitionPlan) {
        let before = self.active.len();
        self.active.retain(|(p, _)| p.owner != plan.owner);
        if self.active.len() != before {
            tracing::trace!(owner = plan.owner, "superseded in-flight transition");
        }
        self.active.push((plan, Duration::ZERO));
    }
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d+\.?\d*|\.?\d+)(?:[eE][-+]?\d+)?").expect("valid regex")
    })
}

/// Interpolates the numbers embedded in two strings, keeping `b`'s literal text.
///
/// The i-th number of `a` moves toward the i-th number of `b`; numbers of `b` without a
/// counterpart (or with an identical one) are emitted as written. At `t >= 1` the result is
/// exactly `b`.
pub fn interpolate_string(a: &str, b: &str, t: f64) -> String {
    if t >= 1.0 {
        return b.to_string();
    }
    let re = number_re();
    let from: Vec<&str> = re.find_iter(a).map(|m| m.as_str()).collect();

    let mut out = String::with_capacity(b.len());
    let mut buf = ryu_js::Buffer::new();
    let mut last = 0;
    for (i, m) in re.find_iter(b).enumerate() {
        out.push_str(&b[last..m.start()]);
        last = m.end();
        let to = m.as_str();
        match from.get(i).filter(|f| **f != to) {
            Some(f) => match (f.parse::<f64>(), to.parse::<f64>()) {
                (Ok(x), Ok(y)) => out.push_str(js_number_with(x + (y - x) * t, &mut buf)),
                _ => out.push_str(to),
            },
            None => out.push_str(to),
        }
    }
    out.push_str(&b[last..]);
    out
}
