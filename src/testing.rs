//! Test doubles shared by the unit tests

use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::pdf::PdfWriter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterCall {
    Append(PathBuf),
    Write(PathBuf),
    Close,
}

/// Writer that records every call and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub calls: Vec<WriterCall>,
    fail_append_at: Option<usize>,
    fail_write: bool,
    appended: usize,
}

impl RecordingWriter {
    /// Fail the append with this zero-based position
    pub fn failing_append(position: usize) -> Self {
        Self {
            fail_append_at: Some(position),
            ..Self::default()
        }
    }

    pub fn failing_write() -> Self {
        Self {
            fail_write: true,
            ..Self::default()
        }
    }
}

impl PdfWriter for RecordingWriter {
    fn append(&mut self, path: &Path) -> Result<()> {
        self.calls.push(WriterCall::Append(path.to_path_buf()));
        let position = self.appended;
        self.appended += 1;
        if self.fail_append_at == Some(position) {
            return Err(Error::EmptyPdf(path.to_path_buf()));
        }
        Ok(())
    }

    fn write(&mut self, destination: &Path) -> Result<()> {
        self.calls.push(WriterCall::Write(destination.to_path_buf()));
        if self.fail_write {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.calls.push(WriterCall::Close);
    }
}
