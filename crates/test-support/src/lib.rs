#![deny(unsafe_code)]

//! crates/test-support/src/lib.rs
//!
//! Shared helpers for dbgline's integration tests: an in-memory writer that
//! records flushes, and a temporary file that can be handed out as a
//! writer.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::NamedTempFile;

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    flushes: usize,
    flushed_len: usize,
}

/// Cloneable in-memory writer. Every clone appends to the same buffer.
#[derive(Clone, Debug, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Captured>>,
}

impl CaptureBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Captured) -> R) -> R {
        let mut captured = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut captured)
    }

    /// Everything written so far, decoded lossily.
    #[must_use]
    pub fn contents(&self) -> String {
        self.with(|captured| String::from_utf8_lossy(&captured.bytes).into_owned())
    }

    /// Raw bytes written so far.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.with(|captured| captured.bytes.clone())
    }

    /// Written text split into lines, terminators removed.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Number of `flush` calls observed.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.with(|captured| captured.flushes)
    }

    /// Reports whether bytes were written after the most recent flush.
    #[must_use]
    pub fn has_unflushed(&self) -> bool {
        self.with(|captured| captured.flushed_len != captured.bytes.len())
    }

    /// Reports whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with(|captured| captured.bytes.is_empty())
    }

    /// Drains the buffer, returning what it held. Flush counts are kept.
    pub fn take(&self) -> String {
        self.with(|captured| {
            captured.flushed_len = 0;
            String::from_utf8_lossy(&std::mem::take(&mut captured.bytes)).into_owned()
        })
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with(|captured| captured.bytes.extend_from_slice(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with(|captured| {
            captured.flushes += 1;
            captured.flushed_len = captured.bytes.len();
        });
        Ok(())
    }
}

/// Writer that fails every write with the configured error kind.
#[derive(Clone, Copy, Debug)]
pub struct FailingWriter {
    kind: io::ErrorKind,
}

impl FailingWriter {
    /// Creates a writer whose writes fail with `kind`.
    #[must_use]
    pub const fn new(kind: io::ErrorKind) -> Self {
        Self { kind }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(self.kind))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(self.kind))
    }
}

/// Temporary log file removed when dropped.
#[derive(Debug)]
pub struct TempLog {
    file: NamedTempFile,
}

impl TempLog {
    /// Creates an empty temporary file.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            file: NamedTempFile::new()?,
        })
    }

    /// Opens a fresh write handle to the file.
    pub fn writer(&self) -> io::Result<File> {
        self.file.reopen()
    }

    /// Reads the whole file from the start.
    pub fn read_to_string(&self) -> io::Result<String> {
        let mut handle = self.file.reopen()?;
        handle.seek(SeekFrom::Start(0))?;
        let mut text = String::new();
        handle.read_to_string(&mut text)?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_buffer() {
        let buffer = CaptureBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"one\ntwo\n").expect("write");
        assert_eq!(buffer.lines(), vec!["one", "two"]);
    }

    #[test]
    fn flush_tracking_follows_writes() {
        let buffer = CaptureBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"pending").expect("write");
        assert!(buffer.has_unflushed());
        writer.flush().expect("flush");
        assert!(!buffer.has_unflushed());
        assert_eq!(buffer.flush_count(), 1);
    }

    #[test]
    fn take_empties_the_buffer() {
        let buffer = CaptureBuffer::new();
        buffer.clone().write_all(b"gone").expect("write");
        assert_eq!(buffer.take(), "gone");
        assert!(buffer.is_empty());
    }

    #[test]
    fn failing_writer_reports_kind() {
        let mut writer = FailingWriter::new(io::ErrorKind::StorageFull);
        let error = writer.write(b"x").expect_err("fails");
        assert_eq!(error.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn temp_log_reads_back_written_text() {
        let log = TempLog::new().expect("temp file");
        let mut handle = log.writer().expect("writer");
        handle.write_all(b"line\n").expect("write");
        handle.flush().expect("flush");
        assert_eq!(log.read_to_string().expect("read"), "line\n");
    }
}
