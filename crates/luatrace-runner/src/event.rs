//! Event envelope and error taxonomy for the runner.

use serde::Serialize;

use luatrace_filter::result::Span;

pub const EVENT_TYPE_OUTPUT_LINE: &str = "output_line";
pub const EVENT_TYPE_NAVIGATION: &str = "navigation";
pub const EVENT_TYPE_DIFF_BLOCK: &str = "diff_block";
pub const EVENT_TYPE_EXIT: &str = "exit";

/// Long output lines are previewed in events, never reflowed.
pub const MAX_EVENT_LINE_LENGTH: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("command is required")]
    MissingCommand,
    #[error("spawn process: {0}")]
    Spawn(String),
    #[error("io: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunnerEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputLineData {
    pub line: String,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationData {
    pub span: Span,
    pub file: String,
    /// 0-based, as the filter hands it out.
    pub line: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffBlockData {
    pub span: Span,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExitData {
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::{OutputLineData, RunnerEvent, EVENT_TYPE_OUTPUT_LINE};

    #[test]
    fn envelope_skips_empty_data() {
        let event = RunnerEvent {
            event_type: EVENT_TYPE_OUTPUT_LINE.to_string(),
            timestamp: "2026-08-06T12:00:00Z".to_string(),
            data: None,
        };
        let json = match serde_json::to_string(&event) {
            Ok(value) => value,
            Err(err) => panic!("serialize event: {err}"),
        };
        assert_eq!(json, r#"{"type":"output_line","timestamp":"2026-08-06T12:00:00Z"}"#);
    }

    #[test]
    fn output_line_data_skips_truncation_flag_when_absent() {
        let data = OutputLineData {
            line: "hello".to_string(),
            offset: 42,
            truncated: None,
        };
        let json = match serde_json::to_string(&data) {
            Ok(value) => value,
            Err(err) => panic!("serialize data: {err}"),
        };
        assert!(!json.contains("truncated"));
        assert!(json.contains("\"offset\":42"));
    }
}
