#![forbid(unsafe_code)]

//! Headless SVG output for `line-chunked-core` geometry.
//!
//! A [`ChunkedLineBinding`] owns the state of one chunked line inside an [`SvgElement`]
//! container. Plain renders apply geometry immediately; [`ChunkedLineBinding::render_with`]
//! routes attribute changes through a [`TransitionContext`] so a [`Scheduler`] can animate them.

pub mod binding;
pub mod document;
pub mod dom;
pub mod transition;

pub use binding::{
    ChunkedLineBinding, DEFINED_CLASS, DEFINED_POINT_CLASS, MarkerShape, RenderState,
    UNDEFINED_CLASS,
};
pub use document::{SvgRenderOptions, render_svg_document};
pub use dom::{NodeId, SvgElement};
pub use transition::{
    Ease, Generation, Scheduler, Timeline, Transition, TransitionContext, TransitionPlan, Tween,
    interpolate_string,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid document {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
