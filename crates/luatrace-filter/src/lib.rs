//! luatrace-filter: line filtering for the output of a monitored Lua process.
//!
//! Two per-line scanners share a single entry point
//! ([`filter::OutputFilter`]): a stateless traceback matcher that turns
//! `<path>:<line>:` occurrences into navigation targets, and a stateful
//! accumulator that collects multi-line `expected:` / `actual:` dumps into
//! paired diff records. File lookup and diff rendering stay behind the
//! [`resolve::FileResolver`] and [`present::DiffPresenter`] traits so hosts
//! can plug in their own.

pub mod diff_block;
pub mod filter;
pub mod present;
pub mod resolve;
pub mod result;
pub mod traceback;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "luatrace-filter"
}
