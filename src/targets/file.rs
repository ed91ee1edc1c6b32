//! Log file handling
//!
//! `LogFile` is a scoped append writer with an explicit open/closed state:
//! opened on first append, optionally closed again after each write, deleted
//! on close when it only ever held transient content (the periodic email
//! buffer). Every exit path releases the handle.

use super::Target;
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use crate::formatters::{DefaultStringConverter, EntryConverter};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

enum WriterState {
    Closed,
    Open(File),
}

pub struct LogFile {
    path: PathBuf,
    keep_open: bool,
    delete_on_close: bool,
    state: WriterState,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keep_open: true,
            delete_on_close: false,
            state: WriterState::Closed,
        }
    }

    /// Close the handle again after every append instead of holding it.
    #[must_use]
    pub fn keep_open(mut self, keep: bool) -> Self {
        self.keep_open = keep;
        self
    }

    /// Remove the file from disk when the writer closes for good.
    #[must_use]
    pub fn delete_on_close(mut self, delete: bool) -> Self {
        self.delete_on_close = delete;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&mut self) -> Result<&mut File> {
        if matches!(self.state, WriterState::Closed) {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| {
                        LoggerError::io_operation(
                            format!("creating log directory '{}'", parent.display()),
                            e,
                        )
                    })?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| {
                    LoggerError::io_operation(
                        format!("opening log file '{}'", self.path.display()),
                        e,
                    )
                })?;
            self.state = WriterState::Open(file);
        }
        match &mut self.state {
            WriterState::Open(file) => Ok(file),
            WriterState::Closed => unreachable!("state set to Open above"),
        }
    }

    /// Append text, opening the file on first use.
    pub fn append(&mut self, text: &str) -> Result<()> {
        let keep_open = self.keep_open;
        let file = self.open()?;
        file.write_all(text.as_bytes()).map_err(|e| {
            LoggerError::io_operation(format!("writing log file '{}'", self.path.display()), e)
        })?;
        if !keep_open {
            self.release();
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let WriterState::Open(file) = &mut self.state {
            file.flush()?;
        }
        Ok(())
    }

    fn release(&mut self) {
        if let WriterState::Open(mut file) = std::mem::replace(&mut self.state, WriterState::Closed)
        {
            let _ = file.flush();
        }
    }

    /// Flush, release the handle, and delete the file if so configured.
    pub fn close(&mut self) {
        self.release();
        if self.delete_on_close {
            let _ = fs::remove_file(&self.path);
        }
    }

    /// Bytes currently on disk; zero when the file was never written.
    pub fn len(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn read_to_string(&self) -> Result<String> {
        let mut content = String::new();
        File::open(&self.path)
            .and_then(|mut f| f.read_to_string(&mut content))
            .map_err(|e| {
                LoggerError::io_operation(
                    format!("reading log file '{}'", self.path.display()),
                    e,
                )
            })?;
        Ok(content)
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        self.close();
    }
}

/// One formatted string appended to a single file per entry.
pub struct FileTarget {
    file: Mutex<LogFile>,
    formatter: Arc<dyn EntryConverter<String>>,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Mutex::new(LogFile::new(path)),
            formatter: Arc::new(DefaultStringConverter::new()),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn EntryConverter<String>>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn path(&self) -> PathBuf {
        self.file.lock().path().to_path_buf()
    }
}

impl Target for FileTarget {
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let msg = self.formatter.convert(entry);
        self.file.lock().append(&msg)
    }

    fn flush(&self) -> Result<()> {
        self.file.lock().flush()
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use tempfile::tempdir;

    #[test]
    fn test_log_file_lazy_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lazy.log");
        let file = LogFile::new(&path);

        // No append yet: nothing on disk.
        assert!(!path.exists());
        assert_eq!(file.len(), 0);
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_log_file_append_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.log");
        let mut file = LogFile::new(&path);

        file.append("hello ").unwrap();
        file.append("world").unwrap();
        file.flush().unwrap();

        assert_eq!(file.read_to_string().unwrap(), "hello world");
        assert_eq!(file.len(), 11);
    }

    #[test]
    fn test_log_file_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deep/x.log");
        let mut file = LogFile::new(&path);
        file.append("x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_delete_on_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("temp.log");
        let mut file = LogFile::new(&path).delete_on_close(true);
        file.append("transient").unwrap();
        assert!(path.exists());
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_keep_open_false_releases_between_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.log");
        let mut file = LogFile::new(&path).keep_open(false);
        file.append("one\n").unwrap();
        file.append("two\n").unwrap();
        assert_eq!(file.read_to_string().unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_file_target_appends_formatted_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target.log");
        let target = FileTarget::new(&path);

        target
            .write(&LogEntry::new("app", Level::Info, "first"))
            .unwrap();
        target
            .write(&LogEntry::new("app", Level::Warn, "second"))
            .unwrap();
        target.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("first"));
        assert!(content.contains("second"));
        let first = content.find("first").unwrap();
        let second = content.find("second").unwrap();
        assert!(first < second);
    }
}
