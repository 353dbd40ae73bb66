#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Stream-order scenarios for the output filter: realistic single-pass
//! sequences mixing tracebacks and diff blocks, with absolute offsets.

use std::sync::Arc;

use luatrace_filter::filter::OutputFilter;
use luatrace_filter::resolve::StaticResolver;
use luatrace_filter::result::{DiffBlockState, DiffRecord, LineResult};

/// Feeds lines in order, tracking the cumulative stream offset the same
/// way a host that normalizes line endings to `\n` would.
fn run_stream(filter: &mut OutputFilter, lines: &[&str]) -> Vec<(usize, LineResult)> {
    let mut offset = 0usize;
    let mut out = Vec::new();
    for line in lines {
        let result = filter.process_line(line, offset);
        out.push((offset, result));
        offset += line.len() + 1;
    }
    out
}

#[test]
fn interpreter_error_and_stack_frames_link_to_resolved_files() {
    let resolver = StaticResolver::new().with("Test.lua", "/ws/Test.lua");
    let mut filter = OutputFilter::new(Arc::new(resolver));

    let lines = [
        "lua.exe: Test.lua:3: attempt to call global 'print1' (a nil value)",
        "stack traceback:",
        "\tTest.lua:3: in function 'a'",
        "\tTest.lua:7: in function 'b'",
        "\tTest.lua:11: in main chunk",
    ];
    let results = run_stream(&mut filter, &lines);

    let expected_lines = [Some(2), None, Some(2), Some(6), Some(10)];
    for ((offset, result), want) in results.iter().zip(expected_lines) {
        match want {
            None => assert!(result.is_none(), "offset {offset}: wanted none"),
            Some(line) => match result {
                LineResult::Navigation(nav) => {
                    assert_eq!(nav.target.line, line);
                    assert_eq!(nav.target.file.to_str(), Some("/ws/Test.lua"));
                    assert!(nav.span.start >= *offset);
                }
                other => panic!("offset {offset}: wanted navigation, got {other:?}"),
            },
        }
    }

    // Spans are absolute: the second frame's span sits past the first two lines.
    let frame_offset = lines[0].len() + 1 + lines[1].len() + 1;
    match &results[2].1 {
        LineResult::Navigation(nav) => {
            assert_eq!(nav.span.start, frame_offset + 1); // past the tab
            assert_eq!(nav.span.end, frame_offset + 1 + "Test.lua:3:".len());
        }
        other => panic!("wanted navigation, got {other:?}"),
    }
}

#[test]
fn diff_block_accumulates_and_completes_across_the_stream() {
    let mut filter = OutputFilter::new(Arc::new(StaticResolver::new()));

    let lines = [
        "x expected:",
        "{",
        "  1,2,3",
        "}",
        "actual:",
        "{",
        "  1,2,4",
        "}",
    ];
    let results = run_stream(&mut filter, &lines);

    assert!(results[0].1.is_none());
    assert!(results[4].1.is_none());

    let mut completed: Option<DiffRecord> = None;
    for (idx, (offset, result)) in results.iter().enumerate() {
        if idx == 0 || idx == 4 {
            continue;
        }
        let update = match result {
            LineResult::DiffBlockUpdate(update) => update,
            other => panic!("line {idx}: wanted diff update, got {other:?}"),
        };
        assert_eq!(update.span.start, *offset);
        assert_eq!(update.span.end, offset + lines[idx].len());
        if idx == 7 {
            assert_eq!(update.state, DiffBlockState::Complete);
            completed = Some(update.record.clone());
        } else {
            assert_eq!(update.state, DiffBlockState::InProgress);
        }
    }

    let record = completed.expect("block completed");
    assert_eq!(record.expected, "{\n  1,2,3\n}\n");
    assert_eq!(record.actual.as_deref(), Some("{\n  1,2,4\n}\n"));
    assert!(!filter.is_collecting_diff());
}

#[test]
fn retriggered_block_starts_clean() {
    let mut filter = OutputFilter::new(Arc::new(StaticResolver::new()));

    let lines = [
        "first expected:",
        "{",
        "  old",
        "second expected:",
        "{",
        "  new",
        "}",
        "actual:",
        "{",
        "  got",
        "}",
    ];
    let results = run_stream(&mut filter, &lines);

    let final_update = match &results[10].1 {
        LineResult::DiffBlockUpdate(update) => update,
        other => panic!("wanted diff update, got {other:?}"),
    };
    assert_eq!(final_update.state, DiffBlockState::Complete);
    assert_eq!(final_update.record.expected, "{\n  new\n}\n");
    assert_eq!(final_update.record.actual.as_deref(), Some("{\n  got\n}\n"));
    assert!(
        !final_update.record.expected.contains("old"),
        "discarded block must not leak into the new one"
    );
}

#[test]
fn traceback_priority_steals_lookalike_diff_content() {
    let resolver = StaticResolver::new().with("inner.lua", "/ws/inner.lua");
    let mut filter = OutputFilter::new(Arc::new(resolver));

    let lines = [
        "x expected:",
        "{",
        "  inner.lua:9: nested failure",
        "}",
        "actual:",
        "{",
        "}",
    ];
    let results = run_stream(&mut filter, &lines);

    assert!(matches!(results[2].1, LineResult::Navigation(_)));

    let final_update = match &results[6].1 {
        LineResult::DiffBlockUpdate(update) => update,
        other => panic!("wanted diff update, got {other:?}"),
    };
    assert_eq!(final_update.state, DiffBlockState::Complete);
    // The stolen line is absent from the accumulated expected text.
    assert_eq!(final_update.record.expected, "{\n}\n");
}

#[test]
fn unterminated_block_stays_open_until_stream_end() {
    let mut filter = OutputFilter::new(Arc::new(StaticResolver::new()));

    let lines = ["x expected:", "{", "  1", "}", "actual:", "{", "  2"];
    let results = run_stream(&mut filter, &lines);

    match &results[6].1 {
        LineResult::DiffBlockUpdate(update) => {
            assert_eq!(update.state, DiffBlockState::InProgress);
        }
        other => panic!("wanted diff update, got {other:?}"),
    }
    assert!(filter.is_collecting_diff());
}
