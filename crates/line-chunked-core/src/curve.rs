//! Curve interpolation seam.
//!
//! The path builder hands each continuous subpath to a [`Curve`]; it never looks at how the
//! points are joined. [`CurveKind`] carries the straight and step curves (d3-shape
//! `curveLinear`, `curveStep`, `curveStepBefore`, `curveStepAfter`).

use crate::fmt::fmt_path_into;
use crate::geom::Point;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub trait Curve: Debug + Send + Sync {
    /// Appends one subpath for `points` (never empty) to `out`.
    fn write_subpath(&self, out: &mut String, points: &[Point]);
}

fn emit_cmd_pair(out: &mut String, cmd: char, x: f64, y: f64) {
    out.push(cmd);
    fmt_path_into(out, x);
    out.push(',');
    fmt_path_into(out, y);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveKind {
    #[default]
    Linear,
    Step,
    StepBefore,
    StepAfter,
}

impl Curve for CurveKind {
    fn write_subpath(&self, out: &mut String, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        emit_cmd_pair(out, 'M', first.x, first.y);
        if rest.is_empty() {
            // d3 closes a lone point so round/square caps still paint a dot.
            out.push('Z');
            return;
        }

        let mut prev = first;
        for p in rest {
            match self {
                CurveKind::Linear => {}
                CurveKind::Step => {
                    let mid_x = (prev.x + p.x) / 2.0;
                    emit_cmd_pair(out, 'L', mid_x, prev.y);
                    emit_cmd_pair(out, 'L', mid_x, p.y);
                }
                CurveKind::StepBefore => emit_cmd_pair(out, 'L', prev.x, p.y),
                CurveKind::StepAfter => emit_cmd_pair(out, 'L', p.x, prev.y),
            }
            emit_cmd_pair(out, 'L', p.x, p.y);
            prev = p;
        }
    }
}

impl std::str::FromStr for CurveKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "linear" | "curveLinear" => Ok(Self::Linear),
            "step" | "curveStep" => Ok(Self::Step),
            "stepBefore" | "curveStepBefore" => Ok(Self::StepBefore),
            "stepAfter" | "curveStepAfter" => Ok(Self::StepAfter),
            _ => Err(()),
        }
    }
}
