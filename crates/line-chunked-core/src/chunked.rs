use crate::accessor::{Accessor, Datum, IsNext, default_x, default_y};
use crate::clip::clip_rects;
use crate::curve::{Curve, CurveKind};
use crate::geom::{ClipRect, Point, PointMarker, point};
use crate::path::build_paths;
use crate::segment::{Run, defined_flags, segment_with_flags};
use crate::style::{AttrMap, default_gap_attrs, default_line_attrs, line_stroke_width};
use serde::Serialize;
use std::sync::Arc;

/// Configuration of a chunked line: accessors, curve, and per-element styles.
///
/// Getters share the option's name; setters are `with_*` builders.
#[derive(Debug)]
pub struct LineChunked<T> {
    x: Accessor<T, f64>,
    y: Accessor<T, f64>,
    defined: Accessor<T, bool>,
    is_next: IsNext<T>,
    curve: Arc<dyn Curve>,
    line_styles: AttrMap,
    line_attrs: AttrMap,
    gap_styles: AttrMap,
    gap_attrs: AttrMap,
    point_styles: AttrMap,
    point_attrs: AttrMap,
    transition_initial: bool,
}

impl<T> Clone for LineChunked<T> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            defined: self.defined.clone(),
            is_next: self.is_next.clone(),
            curve: Arc::clone(&self.curve),
            line_styles: self.line_styles.clone(),
            line_attrs: self.line_attrs.clone(),
            gap_styles: self.gap_styles.clone(),
            gap_attrs: self.gap_attrs.clone(),
            point_styles: self.point_styles.clone(),
            point_attrs: self.point_attrs.clone(),
            transition_initial: self.transition_initial,
        }
    }
}

impl<T: Datum> Default for LineChunked<T> {
    fn default() -> Self {
        Self::with_accessors(default_x(), default_y())
    }
}

impl<T: Datum> LineChunked<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> LineChunked<T> {
    /// Starts from explicit coordinate accessors, for data without a [`Datum`] impl.
    pub fn with_accessors(x: Accessor<T, f64>, y: Accessor<T, f64>) -> Self {
        Self {
            x,
            y,
            defined: Accessor::constant(true),
            is_next: IsNext::constant(true),
            curve: Arc::new(CurveKind::Linear),
            line_styles: AttrMap::new(),
            line_attrs: default_line_attrs(),
            gap_styles: AttrMap::new(),
            gap_attrs: default_gap_attrs(),
            point_styles: AttrMap::new(),
            point_attrs: AttrMap::new(),
            transition_initial: true,
        }
    }

    pub fn x(&self) -> &Accessor<T, f64> {
        &self.x
    }

    pub fn with_x(mut self, x: impl Into<Accessor<T, f64>>) -> Self {
        self.x = x.into();
        self
    }

    pub fn y(&self) -> &Accessor<T, f64> {
        &self.y
    }

    pub fn with_y(mut self, y: impl Into<Accessor<T, f64>>) -> Self {
        self.y = y.into();
        self
    }

    pub fn defined(&self) -> &Accessor<T, bool> {
        &self.defined
    }

    pub fn with_defined(mut self, defined: impl Into<Accessor<T, bool>>) -> Self {
        self.defined = defined.into();
        self
    }

    pub fn is_next(&self) -> &IsNext<T> {
        &self.is_next
    }

    pub fn with_is_next(mut self, is_next: impl Into<IsNext<T>>) -> Self {
        self.is_next = is_next.into();
        self
    }

    pub fn curve(&self) -> &dyn Curve {
        self.curve.as_ref()
    }

    pub fn with_curve(mut self, curve: impl Curve + 'static) -> Self {
        self.curve = Arc::new(curve);
        self
    }

    pub fn line_styles(&self) -> &AttrMap {
        &self.line_styles
    }

    pub fn with_line_styles(mut self, styles: AttrMap) -> Self {
        self.line_styles = styles;
        self
    }

    pub fn line_attrs(&self) -> &AttrMap {
        &self.line_attrs
    }

    pub fn with_line_attrs(mut self, attrs: AttrMap) -> Self {
        self.line_attrs = attrs;
        self
    }

    pub fn gap_styles(&self) -> &AttrMap {
        &self.gap_styles
    }

    pub fn with_gap_styles(mut self, styles: AttrMap) -> Self {
        self.gap_styles = styles;
        self
    }

    pub fn gap_attrs(&self) -> &AttrMap {
        &self.gap_attrs
    }

    pub fn with_gap_attrs(mut self, attrs: AttrMap) -> Self {
        self.gap_attrs = attrs;
        self
    }

    pub fn point_styles(&self) -> &AttrMap {
        &self.point_styles
    }

    pub fn with_point_styles(mut self, styles: AttrMap) -> Self {
        self.point_styles = styles;
        self
    }

    pub fn point_attrs(&self) -> &AttrMap {
        &self.point_attrs
    }

    pub fn with_point_attrs(mut self, attrs: AttrMap) -> Self {
        self.point_attrs = attrs;
        self
    }

    pub fn transition_initial(&self) -> bool {
        self.transition_initial
    }

    pub fn with_transition_initial(mut self, transition_initial: bool) -> Self {
        self.transition_initial = transition_initial;
        self
    }

    /// Stroke width the clip windows are padded by.
    pub fn stroke_width(&self) -> f64 {
        line_stroke_width(&self.line_styles, &self.line_attrs)
    }

    /// Resolved coordinates, `None` for points `defined` rejects.
    pub fn coords(&self, data: &[T], defined: &[bool]) -> Vec<Option<Point>> {
        data.iter()
            .enumerate()
            .map(|(i, d)| defined[i].then(|| point(self.x.get(d, i), self.y.get(d, i))))
            .collect()
    }

    /// Runs the segmentation and geometry pipeline. Pure: no rendering surface is involved.
    pub fn compute(&self, data: &[T]) -> ChunkGeometry {
        let flags = defined_flags(data, &self.defined);
        let runs = segment_with_flags(data, &flags, &self.is_next);
        let coords = self.coords(data, &flags);
        let paths = build_paths(self.curve.as_ref(), &runs, &coords);
        let stroke_width = self.stroke_width();
        let clip_rects = clip_rects(&runs, &coords, stroke_width);

        ChunkGeometry {
            runs,
            defined_path: paths.defined,
            gap_path: paths.gap,
            markers: paths.markers,
            clip_rects,
            stroke_width,
        }
    }
}

/// Output of one pipeline pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkGeometry {
    pub runs: Vec<Run>,
    pub defined_path: String,
    pub gap_path: String,
    pub markers: Vec<PointMarker>,
    pub clip_rects: Vec<ClipRect>,
    pub stroke_width: f64,
}
