use thiserror::Error;

/// Main error type for rotalog
///
/// Only construction, configuration and tooling paths return these. The
/// logging path itself never surfaces an error to the caller.
#[derive(Debug, Error)]
pub enum LogError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration field: {0}")]
    MissingConfigField(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // Log file errors
    #[error("Failed to open log file: {0}")]
    LogFileError(String),

    #[error("Log rotation failed: {0}")]
    LogRotationError(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rotalog operations
pub type Result<T> = std::result::Result<T, LogError>;
