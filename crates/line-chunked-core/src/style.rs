//! Style and attribute dictionaries applied verbatim to the output elements.

use crate::fmt::{js_number, parse_float_prefix};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// Numeric reading, `parseFloat` style for text values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Text(s) => parse_float_prefix(s),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(v) => f.write_str(&js_number(*v)),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Insertion-ordered name → value map; emission order follows insertion order.
pub type AttrMap = IndexMap<String, AttrValue>;

pub fn attr_map<K, V, I>(entries: I) -> AttrMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttrValue>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

pub const STROKE_WIDTH: &str = "stroke-width";
pub const DEFAULT_STROKE_WIDTH: f64 = 1.5;

pub fn default_line_attrs() -> AttrMap {
    attr_map([
        ("fill", AttrValue::from("none")),
        ("stroke", AttrValue::from("#222")),
        (STROKE_WIDTH, AttrValue::from(DEFAULT_STROKE_WIDTH)),
        ("stroke-opacity", AttrValue::from(1)),
    ])
}

pub fn default_gap_attrs() -> AttrMap {
    attr_map([
        ("stroke-dasharray", AttrValue::from("2 2")),
        ("stroke-opacity", AttrValue::from(0.2)),
    ])
}

/// `base` overlaid with `overrides`; overriding keys keep their position in `base`.
pub fn merged(base: &AttrMap, overrides: &AttrMap) -> AttrMap {
    let mut out = base.clone();
    for (k, v) in overrides {
        out.insert(k.clone(), v.clone());
    }
    out
}

/// Stroke width of the defined line: inline style first, then the attribute.
///
/// Unreadable or negative values count as zero.
pub fn line_stroke_width(line_styles: &AttrMap, line_attrs: &AttrMap) -> f64 {
    let raw = line_styles
        .get(STROKE_WIDTH)
        .or_else(|| line_attrs.get(STROKE_WIDTH));
    match raw.and_then(AttrValue::as_f64) {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_js_stringification() {
        assert_eq!(AttrValue::from(1.5).to_string(), "1.5");
        assert_eq!(AttrValue::from(2).to_string(), "2");
        assert_eq!(AttrValue::from("2 2").to_string(), "2 2");
    }

    #[test]
    fn styles_win_over_attrs_for_stroke_width() {
        let attrs = attr_map([(STROKE_WIDTH, 2)]);
        let styles = attr_map([(STROKE_WIDTH, "3px")]);
        assert_eq!(line_stroke_width(&AttrMap::new(), &attrs), 2.0);
        assert_eq!(line_stroke_width(&styles, &attrs), 3.0);
        assert_eq!(line_stroke_width(&AttrMap::new(), &AttrMap::new()), 0.0);
        assert_eq!(line_stroke_width(&AttrMap::new(), &default_line_attrs()), 1.5);
        assert_eq!(
            line_stroke_width(&attr_map([(STROKE_WIDTH, "wide")]), &attrs),
            0.0
        );
    }

    #[test]
    fn merge_keeps_base_order_and_overrides_values() {
        let gap = merged(&default_line_attrs(), &default_gap_attrs());
        let keys: Vec<&str> = gap.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["fill", "stroke", "stroke-width", "stroke-opacity", "stroke-dasharray"]
        );
        assert_eq!(gap["stroke-opacity"], AttrValue::Number(0.2));
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let map: AttrMap =
            serde_json::from_str(r#"{"stroke-width": 0, "stroke": "red"}"#).expect("attr map");
        assert_eq!(map["stroke-width"], AttrValue::Number(0.0));
        assert_eq!(map["stroke"], AttrValue::Text("red".to_string()));
    }
}
