//! Binds a [`LineChunked`] configuration to a container element and keeps the markup in sync
//! across renders.

use crate::dom::{NodeId, SvgElement};
use crate::transition::{Generation, Transition, TransitionContext, TransitionPlan, Tween};
use line_chunked_core::fmt::js_number;
use line_chunked_core::style::{AttrMap, AttrValue, merged};
use line_chunked_core::{
    ChunkGeometry, ClipRect, Degenerate, Keyed, LineChunked, Phase, reconcile,
};
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFINED_CLASS: &str = "line-chunked-defined";
pub const UNDEFINED_CLASS: &str = "line-chunked-undefined";
pub const DEFINED_POINT_CLASS: &str = "line-chunked-defined-point";

const CLIP_PATH_ID_PREFIX: &str = "line-chunked-clip-path";

static NEXT_BINDING_ID: AtomicU64 = AtomicU64::new(0);

fn next_binding_id() -> u64 {
    NEXT_BINDING_ID.fetch_add(1, Ordering::Relaxed)
}

/// Per-binding memory of the last render.
///
/// The previous geometry itself is not kept here: it is read back from the container's live
/// attributes, which also reflect any partially applied transition frame.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    container: Option<NodeId>,
    renders: usize,
}

impl RenderState {
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn renders(&self) -> usize {
        self.renders
    }
}

/// Circle marker geometry as written to the markup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerShape {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Degenerate for MarkerShape {
    fn degenerate(&self) -> Self {
        Self { r: 0.0, ..*self }
    }
}

#[derive(Debug)]
pub struct ChunkedLineBinding {
    id: u64,
    clip_path_id: String,
    state: RenderState,
    generation: Generation,
}

impl Default for ChunkedLineBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedLineBinding {
    pub fn new() -> Self {
        let id = next_binding_id();
        Self::from_parts(id, format!("{CLIP_PATH_ID_PREFIX}-{id}"))
    }

    /// Uses a caller-chosen clip-path id, e.g. to get reproducible documents.
    pub fn with_clip_path_id(clip_path_id: impl Into<String>) -> Self {
        Self::from_parts(next_binding_id(), clip_path_id.into())
    }

    fn from_parts(id: u64, clip_path_id: String) -> Self {
        Self {
            id,
            clip_path_id,
            state: RenderState::default(),
            generation: Generation::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn clip_path_id(&self) -> &str {
        &self.clip_path_id
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Renders synchronously: every shape lands on its final geometry.
    pub fn render<T>(
        &mut self,
        chunked: &LineChunked<T>,
        container: &mut SvgElement,
        data: &[T],
    ) -> ChunkGeometry {
        self.render_inner(chunked, container, data, None)
    }

    /// Renders through a transition. Start values are written now; the rest is scheduled.
    pub fn render_with<T>(
        &mut self,
        chunked: &LineChunked<T>,
        container: &mut SvgElement,
        data: &[T],
        cx: &mut TransitionContext<'_>,
    ) -> ChunkGeometry {
        self.render_inner(chunked, container, data, Some(cx))
    }

    fn render_inner<T>(
        &mut self,
        chunked: &LineChunked<T>,
        container: &mut SvgElement,
        data: &[T],
        cx: Option<&mut TransitionContext<'_>>,
    ) -> ChunkGeometry {
        let geometry = chunked.compute(data);
        // Plans scheduled by earlier renders stop writing from here on.
        let stamp = self.generation.bump();

        if self.state.container != Some(container.node_id()) {
            self.state = RenderState {
                container: Some(container.node_id()),
                ..RenderState::default()
            };
        }
        let first_render = self.state.renders == 0;
        let animate = cx.as_ref().is_some_and(|cx| {
            !cx.transition.is_instant() && !(first_render && !chunked.transition_initial())
        });
        let transition = cx
            .as_ref()
            .map(|cx| cx.transition)
            .unwrap_or_else(Transition::default);

        let purged = container.purge_exiting();
        if purged > 0 {
            tracing::trace!(binding = self.id, purged, "dropped interrupted exits");
        }

        let mut writer = Writer {
            animate,
            plan: TransitionPlan::new(self.id, transition)
                .stamped(self.generation.clone(), stamp),
        };
        let structure = self.ensure_structure(container);

        if let Some(path) = container.find_mut(structure.defined) {
            apply_styling(path, chunked.line_attrs(), chunked.line_styles());
            write_path(&mut writer, path, structure.created, &geometry.defined_path);
        }
        if let Some(path) = container.find_mut(structure.gap) {
            apply_styling(
                path,
                &merged(chunked.line_attrs(), chunked.gap_attrs()),
                &merged(chunked.line_styles(), chunked.gap_styles()),
            );
            write_path(&mut writer, path, structure.created, &geometry.gap_path);
        }

        render_clip_rects(&mut writer, container, structure.clip, &geometry.clip_rects);
        render_markers(&mut writer, container, chunked, &geometry);

        let Writer { plan, .. } = writer;
        if animate && !plan.is_empty() {
            if let Some(cx) = cx {
                cx.schedule(plan);
            }
        }

        tracing::debug!(
            binding = self.id,
            points = data.len(),
            runs = geometry.runs.len(),
            rects = geometry.clip_rects.len(),
            markers = geometry.markers.len(),
            animate,
            "rendered chunked line"
        );

        self.state.renders += 1;
        geometry
    }

    fn ensure_structure(&self, container: &mut SvgElement) -> Structure {
        let mut created = false;
        let clip = container
            .descendants_by_tag("clipPath")
            .into_iter()
            .find(|c| c.attr("id") == Some(self.clip_path_id.as_str()))
            .map(SvgElement::node_id);
        let clip = match clip {
            Some(id) => id,
            None => {
                let mut defs = SvgElement::new("defs");
                let clip_path = SvgElement::new("clipPath").with_attr("id", &self.clip_path_id);
                let id = defs.append(clip_path);
                container.append(defs);
                id
            }
        };

        let gap = match first_with_class(container, UNDEFINED_CLASS) {
            Some(id) => id,
            None => {
                created = true;
                container.append(SvgElement::new("path").with_attr("class", UNDEFINED_CLASS))
            }
        };
        let defined = match first_with_class(container, DEFINED_CLASS) {
            Some(id) => id,
            None => {
                created = true;
                container.append(
                    SvgElement::new("path")
                        .with_attr("class", DEFINED_CLASS)
                        .with_attr("clip-path", format!("url(#{})", self.clip_path_id)),
                )
            }
        };

        Structure {
            clip,
            gap,
            defined,
            created,
        }
    }
}

fn render_clip_rects(
    writer: &mut Writer,
    container: &mut SvgElement,
    clip: NodeId,
    rects: &[ClipRect],
) {
    let live: Vec<(NodeId, ClipRect)> = container
        .find(clip)
        .map(|c| {
            c.children()
                .iter()
                .filter(|r| r.tag() == "rect" && !r.is_exiting())
                .map(|r| (r.node_id(), rect_geometry(r)))
                .collect()
        })
        .unwrap_or_default();
    let previous: Vec<ClipRect> = live.iter().map(|(_, r)| *r).collect();

    for keyed in reconcile(&previous, rects) {
        match keyed.phase {
            Phase::Enter => {
                let mut rect = SvgElement::new("rect");
                if writer.animate {
                    if let Some(start) = &keyed.start {
                        set_rect(&mut rect, start);
                    }
                }
                write_rect(writer, &mut rect, &keyed.end);
                if let Some(clip) = container.find_mut(clip) {
                    clip.append(rect);
                }
            }
            Phase::Update | Phase::Exit => {
                let node = live[keyed.key].0;
                settle(writer, container, node, &keyed, write_rect);
            }
        }
    }
}

fn render_markers<T>(
    writer: &mut Writer,
    container: &mut SvgElement,
    chunked: &LineChunked<T>,
    geometry: &ChunkGeometry,
) {
    let (attrs, styles) = point_styling(chunked);
    let r = chunked
        .point_attrs()
        .get("r")
        .and_then(AttrValue::as_f64)
        .unwrap_or(geometry.stroke_width + 1.0);
    let next: Vec<MarkerShape> = geometry
        .markers
        .iter()
        .map(|m| MarkerShape { cx: m.x, cy: m.y, r })
        .collect();

    let live: Vec<(NodeId, MarkerShape)> = container
        .children_with_class(DEFINED_POINT_CLASS)
        .map(|c| (c.node_id(), marker_geometry(c)))
        .collect();
    let previous: Vec<MarkerShape> = live.iter().map(|(_, m)| *m).collect();

    for keyed in reconcile(&previous, &next) {
        match keyed.phase {
            Phase::Enter => {
                let mut circle =
                    SvgElement::new("circle").with_attr("class", DEFINED_POINT_CLASS);
                if writer.animate {
                    if let Some(start) = &keyed.start {
                        set_marker(&mut circle, start);
                    }
                }
                write_marker(writer, &mut circle, &keyed.end);
                apply_styling(&mut circle, &attrs, &styles);
                container.append(circle);
            }
            Phase::Update => {
                let node = live[keyed.key].0;
                if let Some(circle) = container.find_mut(node) {
                    apply_styling(circle, &attrs, &styles);
                }
                settle(writer, container, node, &keyed, write_marker);
            }
            Phase::Exit => {
                let node = live[keyed.key].0;
                settle(writer, container, node, &keyed, write_marker);
            }
        }
    }
}

/// Moves an existing shape to its keyed end geometry; exiting shapes are removed now or
/// once the transition finishes.
fn settle<G>(
    writer: &mut Writer,
    container: &mut SvgElement,
    node: NodeId,
    keyed: &Keyed<G>,
    write: fn(&mut Writer, &mut SvgElement, &G),
) {
    let exiting = keyed.phase == Phase::Exit;
    if exiting && !writer.animate {
        container.remove(node);
        return;
    }
    if let Some(el) = container.find_mut(node) {
        write(writer, el, &keyed.end);
        if exiting {
            el.mark_exiting();
            writer.plan.removals.push(node);
        }
    }
}

struct Structure {
    clip: NodeId,
    gap: NodeId,
    defined: NodeId,
    created: bool,
}

/// Routes attribute writes either straight to the element or into the transition plan.
struct Writer {
    animate: bool,
    plan: TransitionPlan,
}

impl Writer {
    fn set(&mut self, node: &mut SvgElement, attr: &str, value: String) {
        if self.animate {
            if let Some(current) = node.attr(attr) {
                if current != value {
                    self.plan.tweens.push(Tween {
                        node: node.node_id(),
                        attr: attr.to_string(),
                        from: current.to_string(),
                        to: value,
                    });
                }
                return;
            }
        }
        node.set_attr(attr, value);
    }
}

fn first_with_class(container: &SvgElement, class: &str) -> Option<NodeId> {
    container
        .children_with_class(class)
        .next()
        .map(SvgElement::node_id)
}

fn apply_styling(el: &mut SvgElement, attrs: &AttrMap, styles: &AttrMap) {
    for (name, value) in attrs {
        el.set_attr(name.as_str(), value.to_string());
    }
    for (name, value) in styles {
        el.set_style(name.as_str(), value.to_string());
    }
}

fn write_path(writer: &mut Writer, path: &mut SvgElement, created: bool, d: &str) {
    if created {
        path.set_attr("d", d);
    } else {
        writer.set(path, "d", d.to_string());
    }
}

/// Marker attributes and styles other than geometry; `fill` follows the line stroke.
fn point_styling<T>(chunked: &LineChunked<T>) -> (AttrMap, AttrMap) {
    let mut attrs = AttrMap::new();
    if let Some(stroke) = chunked.line_attrs().get("stroke") {
        attrs.insert("fill".to_string(), stroke.clone());
    }
    let mut attrs = merged(&attrs, chunked.point_attrs());
    for geometric in ["cx", "cy", "r"] {
        attrs.shift_remove(geometric);
    }

    let mut styles = AttrMap::new();
    if let Some(stroke) = chunked.line_styles().get("stroke") {
        styles.insert("fill".to_string(), stroke.clone());
    }
    (attrs, merged(&styles, chunked.point_styles()))
}

fn rect_geometry(el: &SvgElement) -> ClipRect {
    let read = |name: &str| el.attr_f64(name).unwrap_or(0.0);
    ClipRect::new(read("x"), read("y"), read("width"), read("height"))
}

fn set_rect(el: &mut SvgElement, rect: &ClipRect) {
    el.set_attr("x", js_number(rect.x));
    el.set_attr("y", js_number(rect.y));
    el.set_attr("width", js_number(rect.width));
    el.set_attr("height", js_number(rect.height));
}

fn write_rect(writer: &mut Writer, el: &mut SvgElement, rect: &ClipRect) {
    writer.set(el, "x", js_number(rect.x));
    writer.set(el, "y", js_number(rect.y));
    writer.set(el, "width", js_number(rect.width));
    writer.set(el, "height", js_number(rect.height));
}

fn marker_geometry(el: &SvgElement) -> MarkerShape {
    let read = |name: &str| el.attr_f64(name).unwrap_or(0.0);
    MarkerShape {
        cx: read("cx"),
        cy: read("cy"),
        r: read("r"),
    }
}

fn set_marker(el: &mut SvgElement, marker: &MarkerShape) {
    el.set_attr("cx", js_number(marker.cx));
    el.set_attr("cy", js_number(marker.cy));
    el.set_attr("r", js_number(marker.r));
}

fn write_marker(writer: &mut Writer, el: &mut SvgElement, marker: &MarkerShape) {
    writer.set(el, "cx", js_number(marker.cx));
    writer.set(el, "cy", js_number(marker.cy));
    writer.set(el, "r", js_number(marker.r));
}
