use crate::error::{LogError, Result};
use crate::logs::writer::backup_path;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Upper bound on backup indices checked when discovering a chain
const MAX_SCANNED_BACKUPS: usize = 1000;

/// Options for reading logs back
#[derive(Debug, Clone)]
pub struct LogReadOptions {
    /// Number of lines to read from the end
    pub lines: usize,
    /// Whether to include rotated backups
    pub include_backups: bool,
    /// Optional filter pattern (simple substring match)
    pub filter: Option<String>,
}

impl Default for LogReadOptions {
    fn default() -> Self {
        Self {
            lines: 100,
            include_backups: true,
            filter: None,
        }
    }
}

/// List the existing files of a backup chain, oldest first
///
/// Every index up to the scan limit is checked, so a chain with gaps
/// left by a failed rotation still lists its older backups. The base file
/// comes last.
pub fn backup_chain(base: &Path) -> Vec<PathBuf> {
    let mut backups: Vec<PathBuf> = (1..=MAX_SCANNED_BACKUPS)
        .map(|index| backup_path(base, index))
        .filter(|path| path.is_file())
        .collect();
    backups.reverse();

    if base.exists() {
        backups.push(base.to_path_buf());
    }

    backups
}

/// Read the last lines of a log, optionally walking the backup chain
///
/// # Returns
/// * `Ok(Vec<String>)` - Matching lines in chronological order
/// * `Err(LogError)` - Nothing to read or a file could not be read
pub fn read_logs(base: &Path, options: &LogReadOptions) -> Result<Vec<String>> {
    let files = if options.include_backups {
        backup_chain(base)
    } else if base.exists() {
        vec![base.to_path_buf()]
    } else {
        Vec::new()
    };

    if files.is_empty() {
        return Err(LogError::LogFileError(format!(
            "Log file not found: {}",
            base.display()
        )));
    }

    if options.lines == 0 {
        return Ok(Vec::new());
    }

    let mut tail = VecDeque::with_capacity(options.lines.min(1024));

    for path in files {
        let file = File::open(&path).map_err(|e| {
            LogError::LogFileError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        for line in BufReader::new(file).lines() {
            let line = line?;

            if let Some(ref pattern) = options.filter {
                if !line.contains(pattern.as_str()) {
                    continue;
                }
            }

            if tail.len() == options.lines {
                tail.pop_front();
            }
            tail.push_back(line);
        }
    }

    Ok(tail.into_iter().collect())
}

/// Read the last `n` lines of a log
pub fn read_last_lines(base: &Path, n: usize, include_backups: bool) -> Result<Vec<String>> {
    read_logs(
        base,
        &LogReadOptions {
            lines: n,
            include_backups,
            filter: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_chain(dir: &Path) -> PathBuf {
        let base = dir.join("app.log");
        std::fs::write(backup_path(&base, 2), "one\ntwo\n").unwrap();
        std::fs::write(backup_path(&base, 1), "three\nfour\n").unwrap();
        std::fs::write(&base, "five\nsix\n").unwrap();
        base
    }

    #[test]
    fn test_backup_chain_order() {
        let temp_dir = TempDir::new().unwrap();
        let base = write_chain(temp_dir.path());

        let chain = backup_chain(&base);
        assert_eq!(
            chain,
            vec![backup_path(&base, 2), backup_path(&base, 1), base.clone()]
        );
    }

    #[test]
    fn test_backup_chain_skips_gaps() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("app.log");
        std::fs::write(backup_path(&base, 3), "oldest\n").unwrap();
        std::fs::write(backup_path(&base, 1), "newer\n").unwrap();
        std::fs::write(&base, "current\n").unwrap();

        assert_eq!(
            backup_chain(&base),
            vec![backup_path(&base, 3), backup_path(&base, 1), base.clone()]
        );
        assert_eq!(
            read_last_lines(&base, 10, true).unwrap(),
            vec!["oldest", "newer", "current"]
        );
    }

    #[test]
    fn test_read_last_lines_across_chain() {
        let temp_dir = TempDir::new().unwrap();
        let base = write_chain(temp_dir.path());

        assert_eq!(
            read_last_lines(&base, 3, true).unwrap(),
            vec!["four", "five", "six"]
        );
        assert_eq!(read_last_lines(&base, 10, false).unwrap(), vec!["five", "six"]);
        assert_eq!(read_last_lines(&base, 10, true).unwrap().len(), 6);
    }

    #[test]
    fn test_read_logs_with_filter() {
        let temp_dir = TempDir::new().unwrap();
        let base = write_chain(temp_dir.path());

        let options = LogReadOptions {
            lines: 10,
            include_backups: true,
            filter: Some("o".to_string()),
        };
        assert_eq!(read_logs(&base, &options).unwrap(), vec!["one", "two", "four"]);
    }

    #[test]
    fn test_read_missing_log() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_last_lines(&temp_dir.path().join("absent.log"), 5, true);
        assert!(result.is_err());
    }
}
