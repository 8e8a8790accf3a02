use crate::error::{LogError, Result};
use crate::logs::{
    default_formatter, message_only, Dispatcher, Formatter, Level, RotatingFileSink,
    DEFAULT_MAX_BACKUPS, DEFAULT_MAX_LOG_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Upper bound accepted for `max_backups`
const MAX_BACKUPS_LIMIT: usize = 1000;

/// Logger configuration: dispatcher settings plus an optional rotating file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Component name stamped on every record
    #[serde(default = "default_component")]
    pub component: String,

    /// Minimum level delivered to sinks
    #[serde(default = "default_level")]
    pub level: Level,

    /// Rotating file sink settings
    #[serde(default)]
    pub file: Option<FileSinkConfig>,
}

/// Rotating file sink settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSinkConfig {
    /// Base log file path
    pub path: PathBuf,

    /// Maximum size in bytes before rotation
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Number of numbered backups to keep
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Line layout
    #[serde(default)]
    pub format: LineFormat,
}

/// Line layouts selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineFormat {
    /// `[timestamp][LEVEL][component][function:line] message`
    #[default]
    Full,
    /// Message text only
    Message,
}

impl LineFormat {
    pub fn formatter(self) -> Formatter {
        match self {
            LineFormat::Full => Arc::new(default_formatter),
            LineFormat::Message => Arc::new(message_only),
        }
    }
}

// Default value functions for serde
fn default_component() -> String {
    "Logger".to_string()
}

fn default_level() -> Level {
    Level::Info
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_LOG_SIZE
}

fn default_max_backups() -> usize {
    DEFAULT_MAX_BACKUPS
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            component: default_component(),
            level: default_level(),
            file: None,
        }
    }
}

impl LoggerConfig {
    /// Load a logger configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<LoggerConfig> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LogError::ConfigError(format!("Failed to read config file: {}", e)))?;

        // Determine format based on file extension
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let mut config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(LogError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.expand_env_vars();
        config.validate()?;

        Ok(config)
    }

    /// Parse TOML configuration
    pub fn parse_toml(contents: &str) -> Result<LoggerConfig> {
        toml::from_str(contents)
            .map_err(|e| LogError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    /// Parse JSON configuration
    pub fn parse_json(contents: &str) -> Result<LoggerConfig> {
        serde_json::from_str(contents)
            .map_err(|e| LogError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.component.is_empty() {
            return Err(LogError::MissingConfigField("component".to_string()));
        }

        if let Some(ref file) = self.file {
            file.validate()?;
        }

        Ok(())
    }

    /// Build a dispatcher with the configured sinks registered
    ///
    /// # Returns
    /// * `Ok((Dispatcher, Option<Arc<RotatingFileSink>>))` - Dispatcher and
    ///   the file sink, if one is configured
    /// * `Err(LogError)` - Invalid configuration
    pub fn build(&self) -> Result<(Dispatcher, Option<Arc<RotatingFileSink>>)> {
        self.validate()?;

        let dispatcher = Dispatcher::new(self.component.clone(), self.level);

        let sink = match self.file {
            Some(ref file) => {
                let sink = Arc::new(file.open()?);
                dispatcher.register_sink(sink.into_sink());
                Some(sink)
            }
            None => None,
        };

        Ok((dispatcher, sink))
    }

    /// Expand environment variables in the file path
    fn expand_env_vars(&mut self) {
        if let Some(ref mut file) = self.file {
            file.path = expand_env_in_path(&file.path);
        }
    }
}

impl FileSinkConfig {
    /// Validate the file sink settings
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(LogError::MissingConfigField("file.path".to_string()));
        }

        if self.max_size == 0 {
            return Err(LogError::ConfigValidationError(
                "max_size must be greater than 0".to_string(),
            ));
        }

        if self.max_backups > MAX_BACKUPS_LIMIT {
            return Err(LogError::ConfigValidationError(format!(
                "max_backups cannot exceed {}",
                MAX_BACKUPS_LIMIT
            )));
        }

        Ok(())
    }

    /// Open the rotating file sink described by these settings
    pub fn open(&self) -> Result<RotatingFileSink> {
        RotatingFileSink::with_formatter(
            &self.path,
            self.max_size,
            self.max_backups,
            self.format.formatter(),
        )
    }
}

/// Expand `$VAR` and `${VAR}` in a string
///
/// Names are matched in full and looked up one at a time; references to
/// unset variables are left as written.
fn expand_env_in_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };

        let value = if name.is_empty() {
            None
        } else {
            std::env::var(name).ok()
        };

        match value {
            Some(value) => {
                result.push_str(&value);
                rest = &after[consumed..];
            }
            None => {
                result.push('$');
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}

/// Expand environment variables in a path
fn expand_env_in_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(expand_env_in_string(&path_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_config(path: &str) -> FileSinkConfig {
        FileSinkConfig {
            path: PathBuf::from(path),
            max_size: default_max_size(),
            max_backups: default_max_backups(),
            format: LineFormat::default(),
        }
    }

    #[test]
    fn test_logger_config_defaults() {
        let config = LoggerConfig::parse_toml("").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.component, "Logger");
        assert_eq!(config.level, Level::Info);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_file_config_defaults() {
        let config = LoggerConfig::parse_toml(
            r#"
            [file]
            path = "/tmp/app.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.file, Some(file_config("/tmp/app.log")));
    }

    #[test]
    fn test_validate_empty_component() {
        let config = LoggerConfig {
            component: "".to_string(),
            ..LoggerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LogError::MissingConfigField(_))
        ));
    }

    #[test]
    fn test_validate_zero_max_size() {
        let config = LoggerConfig {
            file: Some(FileSinkConfig {
                max_size: 0,
                ..file_config("/tmp/app.log")
            }),
            ..LoggerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LogError::ConfigValidationError(_))
        ));
    }

    #[test]
    fn test_validate_too_many_backups() {
        let config = LoggerConfig {
            file: Some(FileSinkConfig {
                max_backups: MAX_BACKUPS_LIMIT + 1,
                ..file_config("/tmp/app.log")
            }),
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_level_rejected() {
        let result = LoggerConfig::parse_toml(r#"level = "VERBOSE""#);
        assert!(matches!(result, Err(LogError::InvalidConfig(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("logger.yaml");
        fs::write(&config_path, "component: app").unwrap();

        assert!(matches!(
            LoggerConfig::from_file(&config_path),
            Err(LogError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_expand_env_in_path() {
        std::env::set_var("ROTALOG_TEST_DIR", "/var/tmp");
        assert_eq!(
            expand_env_in_path(Path::new("${ROTALOG_TEST_DIR}/app.log")),
            PathBuf::from("/var/tmp/app.log")
        );
    }

    #[test]
    fn test_expand_env_prefers_longest_name() {
        std::env::set_var("ROTALOG_PREFIX", "/short");
        std::env::set_var("ROTALOG_PREFIX_LONG", "/long");
        assert_eq!(expand_env_in_string("$ROTALOG_PREFIX_LONG/app.log"), "/long/app.log");
        assert_eq!(expand_env_in_string("$ROTALOG_PREFIX/app.log"), "/short/app.log");
        assert_eq!(expand_env_in_string("${ROTALOG_PREFIX}_LONG.log"), "/short_LONG.log");
    }

    #[test]
    fn test_expand_env_leaves_unset_names() {
        std::env::remove_var("ROTALOG_UNSET_VAR");
        assert_eq!(
            expand_env_in_string("$ROTALOG_UNSET_VAR/${ROTALOG_UNSET_VAR}/$/app.log"),
            "$ROTALOG_UNSET_VAR/${ROTALOG_UNSET_VAR}/$/app.log"
        );
        assert_eq!(expand_env_in_string("cost$"), "cost$");
        assert_eq!(expand_env_in_string("${unclosed"), "${unclosed");
    }

    #[test]
    fn test_build_registers_file_sink() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        let config = LoggerConfig {
            component: "svc".to_string(),
            level: Level::Debug1,
            file: Some(FileSinkConfig {
                format: LineFormat::Message,
                ..file_config(log_path.to_str().unwrap())
            }),
        };

        let (dispatcher, sink) = config.build().unwrap();
        assert_eq!(dispatcher.sink_count(), 1);
        assert_eq!(dispatcher.threshold(), Level::Debug1);

        dispatcher.debug2("main", 1, "filtered");
        dispatcher.debug1("main", 2, "kept");

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "kept\n");
        assert_eq!(sink.unwrap().current_size(), 5);
    }
}
