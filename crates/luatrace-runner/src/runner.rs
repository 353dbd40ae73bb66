//! Spawns the monitored process and drives the filter over its output.

use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::sync::{mpsc, Arc};
use std::thread;

use luatrace_filter::filter::OutputFilter;
use luatrace_filter::present::{DiffPresenter, NullPresenter};
use luatrace_filter::resolve::{FileResolver, NullResolver};
use luatrace_filter::result::{DiffBlockState, LineResult};

use crate::event::{
    DiffBlockData, ExitData, NavigationData, OutputLineData, RunnerError, RunnerEvent,
    EVENT_TYPE_DIFF_BLOCK, EVENT_TYPE_EXIT, EVENT_TYPE_NAVIGATION, EVENT_TYPE_OUTPUT_LINE,
    MAX_EVENT_LINE_LENGTH,
};
use crate::sink::{EventSink, NoopSink};
use crate::util::{cap_pending_bytes, split_lines, truncate_text};

pub struct Runner {
    pub command: Vec<String>,

    pub event_sink: Arc<dyn EventSink>,
    /// Pass-through echo of the raw merged output.
    pub output_writer: Box<dyn Write + Send>,
    pub resolver: Arc<dyn FileResolver>,
    pub presenter: Arc<dyn DiffPresenter>,
}

impl Runner {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            event_sink: Arc::new(NoopSink),
            output_writer: Box::new(io::sink()),
            resolver: Arc::new(NullResolver),
            presenter: Arc::new(NullPresenter),
        }
    }

    /// Run the monitored command to completion, feeding every output line
    /// through the filter in stream order. Returns the child's exit code.
    pub fn run(&mut self) -> Result<i32, RunnerError> {
        self.validate()?;

        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|err| RunnerError::Spawn(err.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::Spawn("missing stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::Spawn("missing stderr".to_string()))?;

        let (tx, rx) = mpsc::channel::<OutputChunk>();
        spawn_pipe_reader(stdout, tx.clone());
        spawn_pipe_reader(stderr, tx);

        // One filter per monitored process; its accumulator state lives
        // exactly as long as this run.
        let mut filter = OutputFilter::new(self.resolver.clone());
        let mut pending: Vec<u8> = Vec::with_capacity(4096);
        let mut stream_offset = 0usize;
        let mut eof_count = 0usize;

        while eof_count < 2 {
            let chunk = rx.recv().map_err(|err| RunnerError::Io(err.to_string()))?;
            if chunk.eof {
                eof_count += 1;
                continue;
            }
            if chunk.data.is_empty() {
                continue;
            }

            let _ = self.output_writer.write_all(&chunk.data);
            let _ = self.output_writer.flush();

            pending.extend_from_slice(&chunk.data);
            let (lines, remainder) = split_lines(&pending);
            pending = cap_pending_bytes(remainder);

            for line in lines {
                self.handle_line(&mut filter, &line, stream_offset);
                stream_offset += line.len() + 1;
            }
        }

        let status = child
            .wait()
            .map_err(|err| RunnerError::Io(err.to_string()))?;

        let (exit_code, exit_err) = match status.code() {
            Some(code) => (code, String::new()),
            None => (1, "process terminated by signal".to_string()),
        };

        self.emit(
            EVENT_TYPE_EXIT,
            serde_json::to_value(ExitData {
                exit_code,
                error: exit_err,
            })
            .ok(),
        );
        let _ = self.event_sink.close();
        Ok(exit_code)
    }

    fn validate(&self) -> Result<(), RunnerError> {
        if self.command.is_empty() || self.command[0].trim().is_empty() {
            return Err(RunnerError::MissingCommand);
        }
        Ok(())
    }

    fn handle_line(&self, filter: &mut OutputFilter, line: &str, offset: usize) {
        let (preview, truncated) = truncate_text(line, MAX_EVENT_LINE_LENGTH);
        self.emit(
            EVENT_TYPE_OUTPUT_LINE,
            serde_json::to_value(OutputLineData {
                line: preview,
                offset,
                truncated: if truncated { Some(true) } else { None },
            })
            .ok(),
        );

        match filter.process_line(line, offset) {
            LineResult::None => {}
            LineResult::Navigation(nav) => {
                self.emit(
                    EVENT_TYPE_NAVIGATION,
                    serde_json::to_value(NavigationData {
                        span: nav.span,
                        file: nav.target.file.to_string_lossy().into_owned(),
                        line: nav.target.line,
                    })
                    .ok(),
                );
            }
            LineResult::DiffBlockUpdate(update) => {
                // In-progress lines only matter to highlighting hosts; the
                // event stream carries completed blocks.
                if update.state == DiffBlockState::Complete {
                    let expected = update.record.expected;
                    let actual = update.record.actual.unwrap_or_default();
                    self.emit(
                        EVENT_TYPE_DIFF_BLOCK,
                        serde_json::to_value(DiffBlockData {
                            span: update.span,
                            expected: expected.clone(),
                            actual: actual.clone(),
                        })
                        .ok(),
                    );
                    let _ = self.presenter.present(&expected, &actual);
                }
            }
        }
    }

    fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        let event = RunnerEvent {
            event_type: event_type.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            data,
        };
        let _ = self.event_sink.emit(&event);
    }
}

#[derive(Debug)]
struct OutputChunk {
    data: Vec<u8>,
    eof: bool,
}

fn spawn_pipe_reader<R: Read + Send + 'static>(mut reader: R, tx: mpsc::Sender<OutputChunk>) {
    thread::spawn(move || {
        let mut buf = vec![0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    let _ = tx.send(OutputChunk {
                        data: Vec::new(),
                        eof: true,
                    });
                    return;
                }
                Ok(n) => {
                    let _ = tx.send(OutputChunk {
                        data: buf[..n].to_vec(),
                        eof: false,
                    });
                }
                Err(_) => {
                    let _ = tx.send(OutputChunk {
                        data: Vec::new(),
                        eof: true,
                    });
                    return;
                }
            }
        }
    });
}
