//! Value-or-function configuration options, normalized into callables.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Per-point accessor `(datum, index) -> R`.
///
/// Constants and functions are normalized behind [`Accessor::get`], so render code never has to
/// distinguish the two cases.
pub struct Accessor<T, R> {
    source: Source<T, R>,
}

enum Source<T, R> {
    Constant(R),
    Pointer(fn(&T, usize) -> R),
    Closure(Arc<dyn Fn(&T, usize) -> R + Send + Sync>),
}

impl<T, R> Accessor<T, R> {
    pub fn new(f: impl Fn(&T, usize) -> R + Send + Sync + 'static) -> Self {
        Self {
            source: Source::Closure(Arc::new(f)),
        }
    }

    /// Wraps a plain function; unlike [`Accessor::new`] this places no lifetime bound on `T`.
    pub fn from_fn(f: fn(&T, usize) -> R) -> Self {
        Self {
            source: Source::Pointer(f),
        }
    }

    pub fn constant(value: R) -> Self {
        Self {
            source: Source::Constant(value),
        }
    }

    pub fn get(&self, datum: &T, index: usize) -> R
    where
        R: Clone,
    {
        match &self.source {
            Source::Constant(value) => value.clone(),
            Source::Pointer(f) => f(datum, index),
            Source::Closure(f) => f(datum, index),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.source, Source::Constant(_))
    }
}

impl<T, R: Clone> Clone for Accessor<T, R> {
    fn clone(&self) -> Self {
        let source = match &self.source {
            Source::Constant(value) => Source::Constant(value.clone()),
            Source::Pointer(f) => Source::Pointer(*f),
            Source::Closure(f) => Source::Closure(Arc::clone(f)),
        };
        Self { source }
    }
}

impl<T, R: fmt::Debug> fmt::Debug for Accessor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Constant(value) => f.debug_tuple("Accessor").field(value).finish(),
            Source::Pointer(_) | Source::Closure(_) => f.write_str("Accessor(fn)"),
        }
    }
}

impl<T> From<f64> for Accessor<T, f64> {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl<T> From<bool> for Accessor<T, bool> {
    fn from(value: bool) -> Self {
        Self::constant(value)
    }
}

/// Continuity test `(previous, current) -> bool` between two adjacent defined points.
pub struct IsNext<T> {
    source: PairSource<T>,
}

enum PairSource<T> {
    Constant(bool),
    Closure(Arc<dyn Fn(&T, &T) -> bool + Send + Sync>),
}

impl<T> IsNext<T> {
    pub fn new(f: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            source: PairSource::Closure(Arc::new(f)),
        }
    }

    pub fn constant(value: bool) -> Self {
        Self {
            source: PairSource::Constant(value),
        }
    }

    pub fn get(&self, prev: &T, curr: &T) -> bool {
        match &self.source {
            PairSource::Constant(value) => *value,
            PairSource::Closure(f) => f(prev, curr),
        }
    }
}

impl<T> Clone for IsNext<T> {
    fn clone(&self) -> Self {
        let source = match &self.source {
            PairSource::Constant(value) => PairSource::Constant(*value),
            PairSource::Closure(f) => PairSource::Closure(Arc::clone(f)),
        };
        Self { source }
    }
}

impl<T> fmt::Debug for IsNext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            PairSource::Constant(value) => f.debug_tuple("IsNext").field(value).finish(),
            PairSource::Closure(_) => f.write_str("IsNext(fn)"),
        }
    }
}

impl<T> From<bool> for IsNext<T> {
    fn from(value: bool) -> Self {
        Self::constant(value)
    }
}

/// Positional coordinate extraction used by the default `x`/`y` accessors.
///
/// Component 0 is x and component 1 is y. Missing or null components read as `None`.
pub trait Datum {
    fn component(&self, index: usize) -> Option<f64>;
}

impl Datum for [f64; 2] {
    fn component(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }
}

impl Datum for [Option<f64>; 2] {
    fn component(&self, index: usize) -> Option<f64> {
        self.get(index).copied().flatten()
    }
}

impl Datum for (f64, f64) {
    fn component(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.0),
            1 => Some(self.1),
            _ => None,
        }
    }
}

impl Datum for (f64, Option<f64>) {
    fn component(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.0),
            1 => self.1,
            _ => None,
        }
    }
}

impl Datum for crate::geom::Point {
    fn component(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.x),
            1 => Some(self.y),
            _ => None,
        }
    }
}

impl Datum for Value {
    fn component(&self, index: usize) -> Option<f64> {
        match self {
            Value::Array(items) => items.get(index).and_then(Value::as_f64),
            Value::Object(map) => {
                let key = match index {
                    0 => "x",
                    1 => "y",
                    _ => return None,
                };
                map.get(key).and_then(Value::as_f64)
            }
            _ => None,
        }
    }
}

fn component_x<T: Datum>(d: &T, _: usize) -> f64 {
    d.component(0).unwrap_or(f64::NAN)
}

fn component_y<T: Datum>(d: &T, _: usize) -> f64 {
    d.component(1).unwrap_or(f64::NAN)
}

pub fn default_x<T: Datum>() -> Accessor<T, f64> {
    Accessor::from_fn(component_x::<T>)
}

pub fn default_y<T: Datum>() -> Accessor<T, f64> {
    Accessor::from_fn(component_y::<T>)
}
