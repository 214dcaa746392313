#![forbid(unsafe_code)]

//! `line-chunked` draws line charts whose data has holes in it.
//!
//! Defined stretches of the series are drawn as a solid line; the gaps between them are bridged
//! by a styled (by default dashed and faded) line so the reader still sees where the series
//! continues. The solid line is masked by one clip rectangle per defined run.
//!
//! # Features
//!
//! - `render`: enable the headless SVG adapter and transitions (`line_chunked::render`)

pub use line_chunked_core::*;

use serde_json::Value;

/// Parses a JSON array of points (`[[x, y], ...]` or `[{"x": .., "y": ..}, ...]`).
pub fn parse_points(text: &str) -> Result<Vec<Value>> {
    Ok(serde_json::from_str(text)?)
}

/// Runs the geometry pipeline over JSON points with JSON-described options.
pub fn layout_json(points: &[Value], options: ChunkedLineOptions) -> Result<ChunkGeometry> {
    let chunked = options.into_line_chunked()?;
    Ok(chunked.compute(points))
}

#[cfg(feature = "render")]
pub mod render {
    pub use line_chunked_render::{
        ChunkedLineBinding, DEFINED_CLASS, DEFINED_POINT_CLASS, Ease, Generation, MarkerShape,
        NodeId, RenderState, Scheduler, SvgElement, SvgRenderOptions, Timeline, Transition,
        TransitionContext, TransitionPlan, Tween, UNDEFINED_CLASS, render_svg_document,
    };

    use line_chunked_core::{ChunkGeometry, ChunkedLineOptions};
    use serde_json::Value;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Config(#[from] line_chunked_core::Error),
        #[error(transparent)]
        Render(#[from] line_chunked_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Turns a free-form chart name into a clip-path id that is safe inside `url(#...)`.
    ///
    /// Characters outside `[A-Za-z0-9_:.-]` become `-` and dash runs collapse to one. Ids that
    /// would not start with a letter get an `lc-` prefix; blank names map to `lc-untitled`.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 3);
        for ch in raw.trim().chars() {
            let keep = ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '.');
            if keep {
                out.push(ch);
            } else if !(out.is_empty() || out.ends_with('-')) {
                out.push('-');
            }
        }
        let body = out.trim_end_matches('-');
        if body.is_empty() {
            "lc-untitled".to_string()
        } else if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
            body.to_string()
        } else {
            format!("lc-{body}")
        }
    }

    /// Renders JSON points to a standalone SVG document.
    pub fn render_svg(
        points: &[Value],
        options: ChunkedLineOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        Ok(render_svg_with_geometry(points, options, svg_options)?.0)
    }

    /// Like [`render_svg`], also returning the geometry the document was drawn from.
    pub fn render_svg_with_geometry(
        points: &[Value],
        options: ChunkedLineOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<(String, ChunkGeometry)> {
        let chunked = options.into_line_chunked()?;
        Ok(render_svg_document(&chunked, points, svg_options)?)
    }
}
