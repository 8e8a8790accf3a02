use crate::error::{LogError, Result};
use crate::logs::format::{default_formatter, Formatter};
use crate::logs::{LogRecord, Sink};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default maximum log file size before rotation (10MB)
pub const DEFAULT_MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Default number of backups kept next to the base file
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Path of backup `index` for `base`: `<base>.<index>`
pub fn backup_path(base: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// Mutable state guarded by the sink mutex
struct RotationState {
    /// Open handle to the base file, `None` if it could not be opened
    file: Option<File>,
    /// Bytes attributed to the base file so far
    current_size: u64,
    /// Renders each record into a line
    formatter: Formatter,
}

/// RotatingFileSink appends formatted records to a size-bounded file,
/// retiring it into `<path>.1 .. <path>.N` when the next line would not fit.
///
/// The byte counter is seeded from the file size at open time and then only
/// advanced by what this sink writes; changes made by other processes are not
/// noticed.
pub struct RotatingFileSink {
    /// Base log file path
    path: PathBuf,
    /// Maximum size in bytes before rotation
    max_size: u64,
    /// Number of numbered backups to keep
    max_backups: usize,
    state: Mutex<RotationState>,
}

impl RotatingFileSink {
    /// Create a sink with the default full-field formatter
    ///
    /// # Arguments
    /// * `path` - Base log file path
    /// * `max_size` - Maximum size in bytes before rotation, must be non-zero
    /// * `max_backups` - Number of backups to keep, 0 discards the old file
    ///
    /// # Returns
    /// * `Ok(RotatingFileSink)` - Sink created; if the file could not be
    ///   opened it drops every write
    /// * `Err(LogError)` - Invalid parameters
    pub fn new<P: AsRef<Path>>(path: P, max_size: u64, max_backups: usize) -> Result<Self> {
        Self::with_formatter(path, max_size, max_backups, Arc::new(default_formatter))
    }

    /// Create a sink with a custom line formatter
    pub fn with_formatter<P: AsRef<Path>>(
        path: P,
        max_size: u64,
        max_backups: usize,
        formatter: Formatter,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.as_os_str().is_empty() {
            return Err(LogError::MissingConfigField("path".to_string()));
        }

        if max_size == 0 {
            return Err(LogError::ConfigValidationError(
                "max_size must be greater than 0".to_string(),
            ));
        }

        let (file, current_size) = match open_append(&path) {
            Ok((file, size)) => (Some(file), size),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Log file unavailable, records will be dropped"
                );
                (None, 0)
            }
        };

        Ok(Self {
            path,
            max_size,
            max_backups,
            state: Mutex::new(RotationState {
                file,
                current_size,
                formatter,
            }),
        })
    }

    /// Write one record, rotating first if it would overflow the file
    ///
    /// Never fails: rotation and I/O problems are reported through `tracing`
    /// and the record is written to whatever file remains open.
    pub fn write(&self, record: &LogRecord) {
        let mut state = self.lock();

        let mut line = (state.formatter)(record);
        line.push('\n');
        let line_len = line.len() as u64;

        if state.current_size + line_len > self.max_size {
            self.rotate(&mut state);
        }

        let Some(file) = state.file.as_mut() else {
            return;
        };

        let result = file.write_all(line.as_bytes()).and_then(|_| file.flush());
        match result {
            Ok(()) => state.current_size += line_len,
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to write log line"
                );
            }
        }
    }

    /// Replace the line formatter used for subsequent writes
    pub fn set_formatter(&self, formatter: Formatter) {
        self.lock().formatter = formatter;
    }

    /// Wrap the sink as a dispatcher callback
    pub fn into_sink(self: &Arc<Self>) -> Sink {
        let sink = Arc::clone(self);
        Arc::new(move |record: &LogRecord| sink.write(record))
    }

    /// Get the base log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the tracked size of the current file
    pub fn current_size(&self) -> u64 {
        self.lock().current_size
    }

    /// Get the maximum log file size before rotation
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Get the number of backups kept
    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    fn lock(&self) -> MutexGuard<'_, RotationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shift the backup chain and reopen the base file
    ///
    /// The base file is only truncated when its content was moved away or
    /// no history is kept; if it could not be retired it is reopened for
    /// append so no line already on disk is lost.
    fn rotate(&self, state: &mut RotationState) {
        // Close the current handle before renaming
        state.file = None;

        if let Err(e) = self.shift_backups() {
            tracing::error!(path = %self.path.display(), error = %e, "Error rotating log files");
        }

        let reopened = if self.max_backups == 0 || !self.path.exists() {
            open_truncate(&self.path).map(|file| (file, 0))
        } else {
            tracing::warn!(
                path = %self.path.display(),
                "Log file was not retired, appending to it"
            );
            open_append(&self.path)
        };

        match reopened {
            Ok((file, size)) => {
                state.file = Some(file);
                state.current_size = size;
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to reopen log file after rotation"
                );
                state.current_size = 0;
            }
        }
    }

    /// Move `<path>.i` to `<path>.(i+1)` from the oldest down, then the base
    /// file to `<path>.1`. Every step is attempted; the first failure is
    /// returned.
    fn shift_backups(&self) -> Result<()> {
        if self.max_backups == 0 {
            // No history: the reopen truncates the base file
            return Ok(());
        }

        let mut first_error = None;
        let mut record_error = |e: LogError| {
            tracing::warn!(error = %e, "Rotation step skipped");
            first_error.get_or_insert(e);
        };

        let oldest = backup_path(&self.path, self.max_backups);
        if oldest.exists() {
            if let Err(e) = std::fs::remove_file(&oldest) {
                record_error(LogError::LogRotationError(format!(
                    "Failed to remove {}: {}",
                    oldest.display(),
                    e
                )));
            }
        }

        for index in (1..self.max_backups).rev() {
            let from = backup_path(&self.path, index);
            if !from.exists() {
                continue;
            }
            let to = backup_path(&self.path, index + 1);
            if let Err(e) = std::fs::rename(&from, &to) {
                record_error(LogError::LogRotationError(format!(
                    "Failed to rename {} to {}: {}",
                    from.display(),
                    to.display(),
                    e
                )));
            }
        }

        if self.path.exists() {
            let to = backup_path(&self.path, 1);
            if let Err(e) = std::fs::rename(&self.path, &to) {
                record_error(LogError::LogRotationError(format!(
                    "Failed to rename {} to {}: {}",
                    self.path.display(),
                    to.display(),
                    e
                )));
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = state.file.as_mut() {
            let _ = file.flush();
        }
    }
}

/// Open a log file in append mode and report its current size
fn open_append(path: &Path) -> Result<(File, u64)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LogError::LogFileError(format!("Failed to open {}: {}", path.display(), e)))?;

    let size = file.metadata().map(|m| m.len()).unwrap_or(0);

    Ok((file, size))
}

/// Open a fresh, empty log file after rotation
fn open_truncate(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| {
            LogError::LogFileError(format!("Failed to reopen {}: {}", path.display(), e))
        })
}
