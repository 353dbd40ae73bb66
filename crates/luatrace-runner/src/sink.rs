//! Event sinks: where the runner's structured output goes.

use std::io::Write;
use std::sync::Mutex;

use crate::event::RunnerEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &RunnerEvent) -> Result<(), String>;
    fn close(&self) -> Result<(), String>;
}

#[derive(Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &RunnerEvent) -> Result<(), String> {
        Ok(())
    }

    fn close(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Serializes each event as one JSON line to the wrapped writer.
pub struct WriterSink {
    inner: Mutex<WriterSinkInner>,
}

struct WriterSinkInner {
    writer: Option<Box<dyn Write + Send>>,
}

impl WriterSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Mutex::new(WriterSinkInner {
                writer: Some(writer),
            }),
        }
    }
}

impl EventSink for WriterSink {
    fn emit(&self, event: &RunnerEvent) -> Result<(), String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "event writer lock poisoned".to_string())?;
        let writer = inner
            .writer
            .as_mut()
            .ok_or_else(|| "event writer closed".to_string())?;
        serde_json::to_writer(&mut *writer, event).map_err(|err| err.to_string())?;
        writer.write_all(b"\n").map_err(|err| err.to_string())?;
        writer.flush().map_err(|err| err.to_string())
    }

    fn close(&self) -> Result<(), String> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| "event writer lock poisoned".to_string())?;
        let _ = inner.writer.take();
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::{EventSink, NoopSink, WriterSink};
    use crate::event::{RunnerEvent, EVENT_TYPE_EXIT};

    #[derive(Clone, Default)]
    struct SharedBuffer {
        bytes: Arc<Mutex<Vec<u8>>>,
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            match self.bytes.lock() {
                Ok(guard) => String::from_utf8_lossy(&guard).into_owned(),
                Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
            }
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            match self.bytes.lock() {
                Ok(mut guard) => {
                    guard.extend_from_slice(buf);
                    Ok(buf.len())
                }
                Err(_) => Err(std::io::Error::other("buffer lock poisoned")),
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn exit_event() -> RunnerEvent {
        RunnerEvent {
            event_type: EVENT_TYPE_EXIT.to_string(),
            timestamp: "2026-08-06T12:00:00Z".to_string(),
            data: None,
        }
    }

    #[test]
    fn writer_sink_emits_one_json_object_per_line() {
        let buffer = SharedBuffer::default();
        let sink = WriterSink::new(Box::new(buffer.clone()));

        if let Err(err) = sink.emit(&exit_event()) {
            panic!("emit: {err}");
        }
        if let Err(err) = sink.emit(&exit_event()) {
            panic!("emit: {err}");
        }

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = match serde_json::from_str(line) {
                Ok(value) => value,
                Err(err) => panic!("parse event line: {err}"),
            };
            assert_eq!(value["type"], "exit");
        }
    }

    #[test]
    fn writer_sink_rejects_emit_after_close() {
        let sink = WriterSink::new(Box::new(SharedBuffer::default()));
        if let Err(err) = sink.close() {
            panic!("close: {err}");
        }
        let err = match sink.emit(&exit_event()) {
            Ok(()) => panic!("expected closed-sink error"),
            Err(err) => err,
        };
        assert!(err.contains("closed"));
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let sink = NoopSink;
        assert!(sink.emit(&exit_event()).is_ok());
        assert!(sink.close().is_ok());
    }
}
