#![forbid(unsafe_code)]

//! Segmentation and clip geometry for line charts with missing or non-contiguous samples.
//!
//! The pipeline is pure: `(points, accessors, styles) -> (runs, paths, clip rectangles)`.
//! - [`segment`] splits the data into alternating defined/gap runs
//! - [`path`] builds the solid and dashed path data through a pluggable [`Curve`]
//! - [`clip`] computes the windows that show the solid stroke only over defined runs
//! - [`reconcile`] matches shapes between renders so transitions can morph them
//!
//! Rendering lives in `line-chunked-render`.

pub mod accessor;
mod chunked;
pub mod clip;
pub mod curve;
pub mod error;
pub mod fmt;
pub mod geom;
pub mod options;
pub mod path;
pub mod reconcile;
pub mod segment;
pub mod style;

pub use accessor::{Accessor, Datum, IsNext};
pub use chunked::{ChunkGeometry, LineChunked};
pub use curve::{Curve, CurveKind};
pub use error::{Error, Result};
pub use geom::{ClipRect, Point, PointMarker};
pub use options::ChunkedLineOptions;
pub use reconcile::{Degenerate, Keyed, Phase, reconcile};
pub use segment::{Run, RunKind, segment};
pub use style::{AttrMap, AttrValue, attr_map};
