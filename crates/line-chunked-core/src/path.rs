//! Path builder: path data for the defined line, the gap line, and one-point markers.

use crate::curve::Curve;
use crate::geom::{Point, PointMarker};
use crate::segment::Run;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkPaths {
    /// One subpath per defined run.
    pub defined: String,
    /// One subpath through every defined point, ignoring breaks.
    pub gap: String,
    pub markers: Vec<PointMarker>,
}

/// Builds path data from resolved coordinates (`None` for undefined points).
pub fn build_paths(curve: &dyn Curve, runs: &[Run], coords: &[Option<Point>]) -> ChunkPaths {
    let mut paths = ChunkPaths::default();
    let mut scratch: Vec<Point> = Vec::new();

    for run in runs.iter().filter(|r| r.is_defined()) {
        scratch.clear();
        scratch.extend(run.indices().filter_map(|i| coords[i]));
        if scratch.is_empty() {
            continue;
        }
        curve.write_subpath(&mut paths.defined, &scratch);
        if let [only] = scratch.as_slice() {
            paths.markers.push(PointMarker {
                index: run.start_index,
                x: only.x,
                y: only.y,
            });
        }
    }

    scratch.clear();
    scratch.extend(coords.iter().flatten().copied());
    if !scratch.is_empty() {
        curve.write_subpath(&mut paths.gap, &scratch);
    }

    paths
}

/// Number of `M`/`L` commands in a path, the way a straight-segment path is measured.
pub fn command_count(d: &str) -> usize {
    d.chars().filter(|c| matches!(c, 'M' | 'L')).count()
}
