//! JSON options for JSON data (`serde_json::Value` points).
//!
//! Accessors cannot be functions in a config file, so they are described declaratively and
//! resolved into [`Accessor`]s by [`ChunkedLineOptions::into_line_chunked`]. Malformed
//! descriptions fail there, before anything is rendered.

use crate::accessor::{Accessor, IsNext};
use crate::chunked::LineChunked;
use crate::curve::CurveKind;
use crate::error::{Error, Result};
use crate::style::AttrMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChunkedLineOptions {
    /// Number, `{"index": n}` or `{"field": "name"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Value>,
    /// Boolean or `{"notNull": <index|field>}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined: Option<Value>,
    /// Boolean or `{"step": {"index"|"field": .., "by": <number>}}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_next: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_styles: Option<AttrMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_attrs: Option<AttrMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_styles: Option<AttrMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_attrs: Option<AttrMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_styles: Option<AttrMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_attrs: Option<AttrMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_initial: Option<bool>,
}

impl ChunkedLineOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_line_chunked(self) -> Result<LineChunked<Value>> {
        let mut chunked = LineChunked::<Value>::new();
        if let Some(spec) = &self.x {
            chunked = chunked.with_x(coordinate_accessor("x", spec)?);
        }
        if let Some(spec) = &self.y {
            chunked = chunked.with_y(coordinate_accessor("y", spec)?);
        }
        if let Some(spec) = &self.defined {
            chunked = chunked.with_defined(defined_accessor(spec)?);
        }
        if let Some(spec) = &self.is_next {
            chunked = chunked.with_is_next(is_next_accessor(spec)?);
        }
        if let Some(curve) = self.curve {
            chunked = chunked.with_curve(curve);
        }
        if let Some(v) = self.line_styles {
            chunked = chunked.with_line_styles(v);
        }
        if let Some(v) = self.line_attrs {
            chunked = chunked.with_line_attrs(v);
        }
        if let Some(v) = self.gap_styles {
            chunked = chunked.with_gap_styles(v);
        }
        if let Some(v) = self.gap_attrs {
            chunked = chunked.with_gap_attrs(v);
        }
        if let Some(v) = self.point_styles {
            chunked = chunked.with_point_styles(v);
        }
        if let Some(v) = self.point_attrs {
            chunked = chunked.with_point_attrs(v);
        }
        if let Some(v) = self.transition_initial {
            chunked = chunked.with_transition_initial(v);
        }
        Ok(chunked)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Key {
    Index(usize),
    Field(String),
}

impl Key {
    fn parse(option: &str, v: &Value) -> Result<Self> {
        match v {
            Value::Number(n) => n
                .as_u64()
                .map(|i| Key::Index(i as usize))
                .ok_or_else(|| Error::invalid_config(option, "index must be a non-negative integer")),
            Value::String(s) => Ok(Key::Field(s.clone())),
            other => Err(Error::invalid_config(
                option,
                format!("expected an index or field name, got {other}"),
            )),
        }
    }

    fn from_object(option: &str, map: &serde_json::Map<String, Value>) -> Result<Self> {
        match (map.get("index"), map.get("field")) {
            (Some(i), None) => Key::parse(option, i),
            (None, Some(Value::String(f))) => Ok(Key::Field(f.clone())),
            (None, Some(other)) => Err(Error::invalid_config(
                option,
                format!("field must be a string, got {other}"),
            )),
            _ => Err(Error::invalid_config(
                option,
                "expected exactly one of \"index\" or \"field\"",
            )),
        }
    }

    fn lookup<'a>(&self, datum: &'a Value) -> Option<&'a Value> {
        match self {
            Key::Index(i) => datum.as_array()?.get(*i),
            Key::Field(f) => datum.as_object()?.get(f),
        }
    }

    fn number(&self, datum: &Value) -> Option<f64> {
        self.lookup(datum).and_then(Value::as_f64)
    }
}

fn coordinate_accessor(option: &str, spec: &Value) -> Result<Accessor<Value, f64>> {
    match spec {
        Value::Number(n) => n
            .as_f64()
            .map(Accessor::constant)
            .ok_or_else(|| Error::invalid_config(option, "constant is not a finite number")),
        Value::Object(map) => {
            let key = Key::from_object(option, map)?;
            Ok(Accessor::new(move |d: &Value, _| {
                key.number(d).unwrap_or(f64::NAN)
            }))
        }
        other => Err(Error::invalid_config(
            option,
            format!("expected a number or an {{\"index\"|\"field\"}} object, got {other}"),
        )),
    }
}

fn defined_accessor(spec: &Value) -> Result<Accessor<Value, bool>> {
    const OPTION: &str = "defined";
    match spec {
        Value::Bool(b) => Ok(Accessor::constant(*b)),
        Value::Object(map) if map.len() == 1 && map.contains_key("notNull") => {
            let key = Key::parse(OPTION, &map["notNull"])?;
            Ok(Accessor::new(move |d: &Value, _| {
                key.lookup(d).is_some_and(|v| !v.is_null())
            }))
        }
        other => Err(Error::invalid_config(
            OPTION,
            format!("expected a boolean or {{\"notNull\": <key>}}, got {other}"),
        )),
    }
}

fn is_next_accessor(spec: &Value) -> Result<IsNext<Value>> {
    const OPTION: &str = "isNext";
    match spec {
        Value::Bool(b) => Ok(IsNext::constant(*b)),
        Value::Object(map) if map.len() == 1 && map.contains_key("step") => {
            let Value::Object(step) = &map["step"] else {
                return Err(Error::invalid_config(OPTION, "step must be an object"));
            };
            let by = match step.get("by") {
                None => 1.0,
                Some(v) => v
                    .as_f64()
                    .ok_or_else(|| Error::invalid_config(OPTION, "step.by must be a number"))?,
            };
            let mut key_fields = step.clone();
            key_fields.remove("by");
            let key = Key::from_object(OPTION, &key_fields)?;
            Ok(IsNext::new(move |prev: &Value, curr: &Value| {
                match (key.number(prev), key.number(curr)) {
                    (Some(p), Some(c)) => c == p + by,
                    _ => false,
                }
            }))
        }
        other => Err(Error::invalid_config(
            OPTION,
            format!("expected a boolean or {{\"step\": {{..}}}}, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(v: Value) -> ChunkedLineOptions {
        serde_json::from_value(v).expect("options")
    }

    #[test]
    fn empty_options_keep_defaults() {
        let chunked = ChunkedLineOptions::default()
            .into_line_chunked()
            .expect("defaults");
        assert_eq!(chunked.stroke_width(), 1.5);
        assert_eq!(chunked.x().get(&json!([2, 3]), 0), 2.0);
    }

    #[test]
    fn resolves_field_and_index_accessors() {
        let chunked = options(json!({
            "x": {"field": "t"},
            "y": {"index": 1},
            "defined": {"notNull": "v"},
        }))
        .into_line_chunked()
        .expect("resolved");

        assert_eq!(chunked.x().get(&json!({"t": 5}), 0), 5.0);
        assert_eq!(chunked.y().get(&json!([0, 7]), 0), 7.0);
        assert!(chunked.defined().get(&json!({"v": 1}), 0));
        assert!(!chunked.defined().get(&json!({"v": null}), 0));
        assert!(!chunked.defined().get(&json!({}), 0));
    }

    #[test]
    fn constants_resolve_to_constant_accessors() {
        let chunked = options(json!({"x": 1, "defined": false, "isNext": false}))
            .into_line_chunked()
            .expect("resolved");
        assert_eq!(chunked.x().get(&json!(null), 9), 1.0);
        assert!(!chunked.defined().get(&json!(null), 0));
        assert!(!chunked.is_next().get(&json!(null), &json!(null)));
    }

    #[test]
    fn step_is_next_compares_keys() {
        let chunked = options(json!({"isNext": {"step": {"index": 0, "by": 1}}}))
            .into_line_chunked()
            .expect("resolved");
        let is_next = chunked.is_next();
        assert!(is_next.get(&json!([1, 2]), &json!([2, 1])));
        assert!(!is_next.get(&json!([1, 2]), &json!([4, 1])));
    }

    #[test]
    fn malformed_accessors_fail_at_configuration_time() {
        for bad in [
            json!({"x": "first"}),
            json!({"y": {"index": -1}}),
            json!({"y": {"index": 0, "field": "a"}}),
            json!({"defined": 1}),
            json!({"defined": {"notNull": true}}),
            json!({"isNext": {"step": 3}}),
            json!({"isNext": {"step": {"by": 1}}}),
            json!({"isNext": {"step": {"field": "t", "by": "one"}}}),
        ] {
            let err = options(bad.clone())
                .into_line_chunked()
                .expect_err("should be rejected");
            assert!(
                matches!(err, Error::InvalidConfig { .. }),
                "unexpected error for {bad}: {err}"
            );
        }
    }

    #[test]
    fn unknown_keys_are_json_errors() {
        let err = ChunkedLineOptions::from_json(r#"{"lineAtrs": {}}"#).expect_err("typo");
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn styles_and_curve_round_trip_through_json() {
        let opts = ChunkedLineOptions::from_json(
            r#"{"curve": "stepAfter", "lineAttrs": {"stroke-width": 0}, "transitionInitial": false}"#,
        )
        .expect("parse");
        assert_eq!(opts.curve, Some(CurveKind::StepAfter));
        let chunked = opts.into_line_chunked().expect("resolved");
        assert_eq!(chunked.stroke_width(), 0.0);
        assert!(!chunked.transition_initial());
    }
}
