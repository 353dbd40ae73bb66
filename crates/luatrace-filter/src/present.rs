//! Diff presentation seam.
//!
//! The filter's only obligation for a completed block is to hand over two
//! immutable strings; when and how they are shown is the host's decision.

use std::io::Write;
use std::sync::Mutex;

pub trait DiffPresenter: Send + Sync {
    fn present(&self, expected: &str, actual: &str) -> Result<(), String>;
}

/// Discards completed records.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl DiffPresenter for NullPresenter {
    fn present(&self, _expected: &str, _actual: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Writes a labeled two-section dump, the plain-text stand-in for a
/// side-by-side viewer.
pub struct TextPresenter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextPresenter {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl DiffPresenter for TextPresenter {
    fn present(&self, expected: &str, actual: &str) -> Result<(), String> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| "presenter lock poisoned".to_string())?;
        write_section(&mut **writer, "--- expected", expected)?;
        write_section(&mut **writer, "+++ actual", actual)?;
        writer.flush().map_err(|err| err.to_string())
    }
}

fn write_section(writer: &mut dyn Write, header: &str, body: &str) -> Result<(), String> {
    writeln!(writer, "{header}").map_err(|err| err.to_string())?;
    writer.write_all(body.as_bytes()).map_err(|err| err.to_string())?;
    if !body.ends_with('\n') {
        writeln!(writer).map_err(|err| err.to_string())?;
    }
    Ok(())
}
