//! Stateless `<path>:<line>:` extraction from interpreter output.
//!
//! Recognizes the location prefix the Lua interpreter and its test runners
//! print in error messages and stack frames:
//!
//! ```text
//! lua: Test.lua:3: attempt to call global 'print1' (a nil value)
//! stack traceback:
//!         Test.lua:3: in function 'a'
//!         Test.lua:11: in main chunk
//! ```

use regex::Regex;

/// Path token excludes the characters a path cannot carry on the platforms
/// the interpreter reports from, plus space; one or more leading `/` allowed.
const FILE_LINE_PATTERN: &str = r#"\s*((?:/+)?[^<>\\|:"*? ]+):([0-9]+):"#;

/// One recognized location in a line. Offsets are bytes relative to the
/// line; `line_number` is 1-based as printed and guaranteed non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracebackHit<'a> {
    /// Reported path with a leading `...` truncation marker stripped.
    pub path: &'a str,
    pub line_number: u32,
    /// Start of the path capture (the `...` marker, when present, is part
    /// of the highlighted span even though it is stripped from `path`).
    pub start: usize,
    /// End of the digit capture plus the trailing colon.
    pub end: usize,
}

#[derive(Debug)]
pub struct TracebackMatcher {
    pattern: Option<Regex>,
}

impl TracebackMatcher {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(FILE_LINE_PATTERN).ok(),
        }
    }

    /// Unanchored search; the first occurrence wins, later candidates on
    /// the same line are ignored. Returns `None` for unmatched lines and
    /// for matches whose digits do not fit a positive `u32` (fail closed
    /// rather than hand out an invalid location).
    pub fn find<'l>(&self, line: &'l str) -> Option<TracebackHit<'l>> {
        let caps = self.pattern.as_ref()?.captures(line)?;
        let path = caps.get(1)?;
        let digits = caps.get(2)?;

        let raw = path.as_str();
        let stripped = raw.strip_prefix("...").unwrap_or(raw);
        let line_number: u32 = digits.as_str().parse().ok()?;
        if line_number == 0 {
            return None;
        }

        Some(TracebackHit {
            path: stripped,
            line_number,
            start: path.start(),
            end: digits.end() + 1,
        })
    }
}

impl Default for TracebackMatcher {
    fn default() -> Self {
        Self::new()
    }
}
