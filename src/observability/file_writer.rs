//! Rotating log file writer with size-based rotation and backup retention.
//!
//! [`FileWriter`] implements `tracing_subscriber`'s `MakeWriter`: each log event
//! is buffered in a [`LogLine`] and appended to the file in one write when the
//! line is dropped, so concurrent events never interleave.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// When the current file exceeds its size limit it is renamed to
/// `<name>.<unix_millis>` and a fresh file is started. Backups beyond the
/// retention limit are deleted, oldest first.
///
/// # Example
///
/// ```rust
/// use rowselect::observability::FileWriter;
///
/// let dir = std::env::temp_dir().join("rowselect-doc");
/// let writer = FileWriter::new(dir.join("rowselect.log"));
/// writer.write_all_bytes(b"engine ready\n")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened lazily on first write.
    writer: Mutex<Option<fs::File>>,
}

impl FileWriter {
    /// Creates a writer with the default limits.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `bytes` to the file, rotating first if the file is too large.
    ///
    /// # Errors
    ///
    /// May fail due to file system permissions, disk space exhaustion, or a
    /// poisoned mutex.
    pub fn write_all_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            if let Some(parent) = self.file_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;
        file.write_all(bytes)?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let backup_path = PathBuf::from(format!("{}.{timestamp}", self.file_path.display()));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
        let file_name = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Invalid file name"))?;
        let prefix = format!("{file_name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_prefix(&prefix))
                    .is_some_and(|suffix| suffix.chars().all(|c| c.is_ascii_digit()))
            })
            .collect();

        // names end in a millisecond timestamp, so lexical order on equal-length
        // suffixes is age order
        backups.sort_by(|a, b| b.cmp(a));

        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

/// One buffered log event; appended to the file when dropped.
pub struct LogLine<'a> {
    target: &'a FileWriter,
    buf: Vec<u8>,
}

impl Write for LogLine<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let result = self.target.write_all_bytes(&self.buf);
        self.buf.clear();
        result
    }
}

impl Drop for LogLine<'_> {
    fn drop(&mut self) {
        // nowhere to report a failure from inside the logger
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = LogLine<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogLine {
            target: self,
            buf: Vec::new(),
        }
    }
}
