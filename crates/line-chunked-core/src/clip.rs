//! Clip windows that restrict the solid stroke to the defined runs.
//!
//! Outside these windows only the dashed gap stroke is visible. Every window spans the full y
//! extent of the defined data, and windows touching the ends of the data are widened by the
//! stroke width so line caps are not cut off.

use crate::geom::{ClipRect, Point};
use crate::segment::Run;

pub fn clip_rects(runs: &[Run], coords: &[Option<Point>], stroke_width: f64) -> Vec<ClipRect> {
    let defined: Vec<&Run> = runs.iter().filter(|r| r.is_defined()).collect();
    let Some((y_min, y_max)) = y_extent(coords) else {
        return Vec::new();
    };
    let pad = if stroke_width.is_finite() && stroke_width > 0.0 {
        stroke_width
    } else {
        0.0
    };

    let last = defined.len().saturating_sub(1);
    let mut out = Vec::with_capacity(defined.len());
    for (i, run) in defined.iter().enumerate() {
        let (Some(first), Some(end)) = (coords[run.start_index], coords[run.end_index]) else {
            continue;
        };
        let mut rect = ClipRect::new(
            first.x.min(end.x),
            y_min - pad,
            (end.x - first.x).abs(),
            (y_max + pad) - (y_min - pad),
        );
        if i == 0 {
            rect.x -= pad;
            rect.width += pad;
        }
        if i == last {
            rect.width += pad;
        }
        out.push(rect);
    }
    out
}

/// Min/max of the finite y values among defined points.
pub fn y_extent(coords: &[Option<Point>]) -> Option<(f64, f64)> {
    coords
        .iter()
        .flatten()
        .map(|p| p.y)
        .filter(|y| y.is_finite())
        .fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
}
