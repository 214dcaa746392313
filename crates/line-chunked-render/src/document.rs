//! Standalone SVG documents around a single chunked line.

use crate::binding::ChunkedLineBinding;
use crate::dom::SvgElement;
use crate::{Error, Result};
use line_chunked_core::fmt::js_number;
use line_chunked_core::{ChunkGeometry, LineChunked};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderOptions {
    /// Document width; defaults to the viewBox width.
    pub width: Option<f64>,
    /// Document height; defaults to the viewBox height.
    pub height: Option<f64>,
    /// Adds extra space around the data extent when computing the viewBox.
    pub viewbox_padding: f64,
    /// Clip-path id. A process-unique id is generated when unset.
    pub clip_path_id: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            viewbox_padding: 8.0,
            clip_path_id: None,
        }
    }
}

impl SvgRenderOptions {
    fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(Error::InvalidDimension { name, value });
                }
            }
        }
        if !(self.viewbox_padding.is_finite() && self.viewbox_padding >= 0.0) {
            return Err(Error::InvalidDimension {
                name: "viewbox_padding",
                value: self.viewbox_padding,
            });
        }
        Ok(())
    }
}

/// Renders `data` into `<svg><g>…</g></svg>`. Also returns the computed geometry.
pub fn render_svg_document<T>(
    chunked: &LineChunked<T>,
    data: &[T],
    options: &SvgRenderOptions,
) -> Result<(String, ChunkGeometry)> {
    options.validate()?;

    let mut binding = match &options.clip_path_id {
        Some(id) => ChunkedLineBinding::with_clip_path_id(id.as_str()),
        None => ChunkedLineBinding::new(),
    };
    let mut group = SvgElement::new("g");
    let geometry = binding.render(chunked, &mut group, data);

    let (min_x, min_y, w, h) = viewbox(&geometry, options.viewbox_padding);
    let mut svg = SvgElement::new("svg")
        .with_attr("xmlns", SVG_NS)
        .with_attr("width", js_number(options.width.unwrap_or(w)))
        .with_attr("height", js_number(options.height.unwrap_or(h)))
        .with_attr(
            "viewBox",
            format!(
                "{} {} {} {}",
                js_number(min_x),
                js_number(min_y),
                js_number(w),
                js_number(h)
            ),
        );
    svg.append(group);
    Ok((svg.to_svg(), geometry))
}

/// Union of the clip windows (which already span the y-extent and stroke padding).
fn viewbox(geometry: &ChunkGeometry, padding: f64) -> (f64, f64, f64, f64) {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for r in &geometry.clip_rects {
        if !(r.x.is_finite() && r.y.is_finite() && r.right().is_finite() && r.bottom().is_finite())
        {
            continue;
        }
        bounds = Some(match bounds {
            None => (r.x, r.y, r.right(), r.bottom()),
            Some((x0, y0, x1, y1)) => (
                x0.min(r.x),
                y0.min(r.y),
                x1.max(r.right()),
                y1.max(r.bottom()),
            ),
        });
    }
    let (x0, y0, x1, y1) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));
    (
        x0 - padding,
        y0 - padding,
        (x1 - x0) + 2.0 * padding,
        (y1 - y0) + 2.0 * padding,
    )
}
