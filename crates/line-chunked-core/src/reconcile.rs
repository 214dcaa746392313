//! Ordinal matching of shapes between consecutive renders.
//!
//! Runs have no identity of their own, so the k-th shape of a category in the new render is
//! matched with the k-th shape of the previous render.

use crate::geom::ClipRect;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// Collapsed form a shape grows from when entering and shrinks to when exiting.
pub trait Degenerate {
    fn degenerate(&self) -> Self;
}

impl Degenerate for ClipRect {
    fn degenerate(&self) -> Self {
        self.collapsed()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<G> {
    pub key: usize,
    pub phase: Phase,
    /// Geometry to place the shape at before animating; `None` keeps its current geometry.
    pub start: Option<G>,
    pub end: G,
}

pub fn reconcile<G: Degenerate + Clone>(previous: &[G], next: &[G]) -> Vec<Keyed<G>> {
    let count = previous.len().max(next.len());
    let mut out = Vec::with_capacity(count);
    for key in 0..count {
        let keyed = match (previous.get(key), next.get(key)) {
            (Some(_), Some(target)) => Keyed {
                key,
                phase: Phase::Update,
                start: None,
                end: target.clone(),
            },
            (None, Some(target)) => Keyed {
                key,
                phase: Phase::Enter,
                start: Some(target.degenerate()),
                end: target.clone(),
            },
            (Some(gone), None) => Keyed {
                key,
                phase: Phase::Exit,
                start: None,
                end: gone.degenerate(),
            },
            (None, None) => unreachable!("key is below max(previous, next)"),
        };
        out.push(keyed);
    }
    out
}
