//! Per-line dispatch over the two scanners.

use std::sync::Arc;

use crate::diff_block::DiffAccumulator;
use crate::resolve::FileResolver;
use crate::result::{LineResult, NavigationResult, NavigationTarget, Span};
use crate::traceback::TracebackMatcher;

/// One filter per monitored process/session. Lines must be delivered in
/// stream order, one call per line; the accumulator state is the only
/// thing carried across calls, so the filter is not reentrant for
/// concurrent lines.
pub struct OutputFilter {
    matcher: TracebackMatcher,
    accumulator: DiffAccumulator,
    resolver: Arc<dyn FileResolver>,
}

impl OutputFilter {
    pub fn new(resolver: Arc<dyn FileResolver>) -> Self {
        Self {
            matcher: TracebackMatcher::new(),
            accumulator: DiffAccumulator::new(),
            resolver,
        }
    }

    /// Classify one line. `line_offset` is the line's absolute byte offset
    /// in the accumulated output stream; spans in the result are absolute.
    ///
    /// The traceback matcher runs first and claims the line only when the
    /// pattern matches AND the path resolves; otherwise the line falls
    /// through to the diff accumulator. Traceback lines never end in the
    /// diff markers, but diff content can look like a traceback; such
    /// lines are claimed as navigation and lost from the diff text.
    pub fn process_line(&mut self, line: &str, line_offset: usize) -> LineResult {
        if let Some(hit) = self.matcher.find(line) {
            if let Some(file) = self.resolver.resolve(hit.path) {
                let target = NavigationTarget {
                    file,
                    // 1-based in the output, 0-based for consumers; the
                    // matcher guarantees a non-zero line number.
                    line: hit.line_number - 1,
                };
                let span = Span::new(line_offset + hit.start, line_offset + hit.end);
                return LineResult::Navigation(NavigationResult { span, target });
            }
        }
        self.accumulator.feed(line, line_offset)
    }

    /// Whether a diff block is currently open.
    pub fn is_collecting_diff(&self) -> bool {
        self.accumulator.is_collecting()
    }
}
