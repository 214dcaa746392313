//! Run segmentation: split a point sequence into alternating defined and gap runs.

use crate::accessor::{Accessor, IsNext};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunKind {
    Defined,
    /// `before`/`after` are the shared boundary indices of the neighbouring defined runs.
    Gap {
        before: Option<usize>,
        after: Option<usize>,
    },
}

/// Inclusive index range into the input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(flatten)]
    pub kind: RunKind,
    pub start_index: usize,
    pub end_index: usize,
}

impl Run {
    fn defined(start_index: usize, end_index: usize) -> Self {
        Self {
            kind: RunKind::Defined,
            start_index,
            end_index,
        }
    }

    fn gap(start_index: usize, end_index: usize, defined: &[bool]) -> Self {
        let before = defined[start_index].then_some(start_index);
        let after = defined[end_index].then_some(end_index);
        Self {
            kind: RunKind::Gap { before, after },
            start_index,
            end_index,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self.kind, RunKind::Defined)
    }

    pub fn is_gap(&self) -> bool {
        !self.is_defined()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }

    /// The run's points, including shared boundary points for gap runs.
    pub fn points<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        &data[self.start_index..=self.end_index]
    }
}

/// Evaluates `defined` once per point.
pub fn defined_flags<T>(data: &[T], defined: &Accessor<T, bool>) -> Vec<bool> {
    data.iter()
        .enumerate()
        .map(|(i, d)| defined.get(d, i))
        .collect()
}

/// Partitions `data` into runs in a single left-to-right scan.
///
/// A break falls between `i - 1` and `i` when either point is undefined or `is_next` rejects
/// the pair. Every break between two defined runs produces a gap run, even when no undefined
/// point sits between them.
pub fn segment<T>(data: &[T], defined: &Accessor<T, bool>, is_next: &IsNext<T>) -> Vec<Run> {
    let flags = defined_flags(data, defined);
    segment_with_flags(data, &flags, is_next)
}

pub fn segment_with_flags<T>(data: &[T], defined: &[bool], is_next: &IsNext<T>) -> Vec<Run> {
    debug_assert_eq!(data.len(), defined.len());
    let mut runs = Vec::new();
    // (start, end) of the defined run being extended.
    let mut open_defined: Option<(usize, usize)> = None;
    // First index of the gap being extended; a defined boundary point when one exists.
    let mut open_gap: Option<usize> = None;

    for (i, datum) in data.iter().enumerate() {
        if defined[i] {
            match open_defined {
                Some((start, end)) => {
                    if is_next.get(&data[end], datum) {
                        open_defined = Some((start, i));
                    } else {
                        runs.push(Run::defined(start, end));
                        runs.push(Run::gap(end, i, defined));
                        open_defined = Some((i, i));
                    }
                }
                None => {
                    if let Some(gap_start) = open_gap.take() {
                        runs.push(Run::gap(gap_start, i, defined));
                    }
                    open_defined = Some((i, i));
                }
            }
        } else if let Some((start, end)) = open_defined.take() {
            runs.push(Run::defined(start, end));
            open_gap = Some(end);
        } else if open_gap.is_none() {
            open_gap = Some(i);
        }
    }

    if let Some((start, end)) = open_defined {
        runs.push(Run::defined(start, end));
    } else if let Some(gap_start) = open_gap {
        runs.push(Run::gap(gap_start, data.len() - 1, defined));
    }

    tracing::trace!(points = data.len(), runs = runs.len(), "segmented line data");
    runs
}

pub fn defined_runs(runs: &[Run]) -> impl Iterator<Item = &Run> {
    runs.iter().filter(|r| r.is_defined())
}

pub fn gap_runs(runs: &[Run]) -> impl Iterator<Item = &Run> {
    runs.iter().filter(|r| r.is_gap())
}
