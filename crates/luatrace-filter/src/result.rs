//! Per-line classification results.
//!
//! Offsets in a [`Span`] are byte positions within the full accumulated
//! output stream, not within the current line; the host adds each line's
//! stream offset before results leave the filter.

use std::path::PathBuf;

use serde::Serialize;

/// Half-open byte range `[start, end)` in the accumulated output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A resolved source location the user can jump to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    /// Concrete file produced by the resolver collaborator.
    pub file: PathBuf,
    /// 0-based line, converted from the 1-based number in the output.
    pub line: u32,
}

/// A claimed traceback line: the highlight span plus its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationResult {
    pub span: Span,
    pub target: NavigationTarget,
}

/// Paired expected/actual text accumulated from a diff block.
///
/// `actual` stays `None` until the `actual:` marker line is seen. Each
/// accumulated line contributes itself plus a trailing newline; the marker
/// lines are part of neither text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl DiffRecord {
    pub fn new() -> Self {
        Self {
            expected: String::new(),
            actual: None,
        }
    }
}

impl Default for DiffRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffBlockState {
    InProgress,
    Complete,
}

/// One diff-block content line: the whole-line span plus the record.
///
/// While the block is open the accumulator owns the record and `record` is
/// a snapshot; on the closing line `state` is [`DiffBlockState::Complete`]
/// and `record` is the finalized record itself, moved out of the
/// accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffBlockUpdate {
    pub span: Span,
    pub state: DiffBlockState,
    pub record: DiffRecord,
}

/// Outcome of processing one output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResult {
    /// Line claimed by neither scanner.
    None,
    Navigation(NavigationResult),
    DiffBlockUpdate(DiffBlockUpdate),
}

impl LineResult {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
