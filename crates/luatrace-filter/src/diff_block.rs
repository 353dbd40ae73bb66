//! Stateful accumulation of test-framework diff dumps.
//!
//! Test runners print assertion failures as a framed pair of table dumps:
//!
//! ```text
//! ...some_test.lua:116: expected:
//! {
//!   1,2,3
//! }
//! actual:
//! {
//!   1,2,4
//! }
//! ```
//!
//! The accumulator walks that frame with an explicit three-state machine
//! and hands the paired texts out as one [`DiffRecord`]. Marker lines open
//! and split the block but are part of neither text; the block closes on a
//! line that is exactly `}`.

use crate::result::{DiffBlockState, DiffBlockUpdate, DiffRecord, LineResult, Span};

const EXPECTED_MARKER: &str = "expected:";
const ACTUAL_MARKER: &str = "actual:";
const BLOCK_CLOSE: &str = "}";

#[derive(Debug)]
enum AccumState {
    Idle,
    CollectingExpected(DiffRecord),
    CollectingActual(DiffRecord),
}

/// One accumulator per monitored stream; lines must arrive in stream
/// order, there is no lookahead. A block that never closes stays open
/// until the stream ends or the next `expected:` marker discards it;
/// never an error.
#[derive(Debug)]
pub struct DiffAccumulator {
    state: AccumState,
}

impl DiffAccumulator {
    pub fn new() -> Self {
        Self {
            state: AccumState::Idle,
        }
    }

    pub fn is_collecting(&self) -> bool {
        !matches!(self.state, AccumState::Idle)
    }

    /// Advance the machine with one line. `line_offset` is the line's
    /// absolute byte offset in the output stream; emitted spans cover the
    /// entire line.
    pub fn feed(&mut self, line: &str, line_offset: usize) -> LineResult {
        let trimmed = line.trim_end();

        // An `expected:` marker opens a fresh record in every state,
        // silently discarding any block still open.
        if trimmed.ends_with(EXPECTED_MARKER) {
            self.state = AccumState::CollectingExpected(DiffRecord::new());
            return LineResult::None;
        }

        match std::mem::replace(&mut self.state, AccumState::Idle) {
            AccumState::Idle => LineResult::None,
            AccumState::CollectingExpected(mut record) => {
                if trimmed.ends_with(ACTUAL_MARKER) {
                    record.actual = Some(String::new());
                    self.state = AccumState::CollectingActual(record);
                    return LineResult::None;
                }
                record.expected.push_str(line);
                record.expected.push('\n');
                let update = DiffBlockUpdate {
                    span: whole_line_span(line, line_offset),
                    state: DiffBlockState::InProgress,
                    record: record.clone(),
                };
                self.state = AccumState::CollectingExpected(record);
                LineResult::DiffBlockUpdate(update)
            }
            AccumState::CollectingActual(mut record) => {
                if trimmed.ends_with(ACTUAL_MARKER) {
                    // A repeated marker restarts the actual text.
                    record.actual = Some(String::new());
                    self.state = AccumState::CollectingActual(record);
                    return LineResult::None;
                }
                let actual = record.actual.get_or_insert_with(String::new);
                actual.push_str(line);
                actual.push('\n');

                let span = whole_line_span(line, line_offset);
                if line == BLOCK_CLOSE {
                    // Last line of the table dump: the record is final and
                    // ownership moves to the caller.
                    return LineResult::DiffBlockUpdate(DiffBlockUpdate {
                        span,
                        state: DiffBlockState::Complete,
                        record,
                    });
                }
                let update = DiffBlockUpdate {
                    span,
                    state: DiffBlockState::InProgress,
                    record: record.clone(),
                };
                self.state = AccumState::CollectingActual(record);
                LineResult::DiffBlockUpdate(update)
            }
        }
    }
}

impl Default for DiffAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

fn whole_line_span(line: &str, line_offset: usize) -> Span {
    Span::new(line_offset, line_offset + line.len())
}
