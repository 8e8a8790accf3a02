use crate::error::LogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug3,
    Debug2,
    Debug1,
    Info,
    Warn,
    Error,
}

impl Level {
    /// All levels in ascending severity
    pub const ALL: [Level; 7] = [
        Level::Trace,
        Level::Debug3,
        Level::Debug2,
        Level::Debug1,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug3 => "DEBUG3",
            Level::Debug2 => "DEBUG2",
            Level::Debug1 => "DEBUG1",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(value: u8) -> Level {
        Self::ALL
            .get(value as usize)
            .copied()
            .unwrap_or(Level::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width specifiers like {:<6} apply
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                LogError::ConfigValidationError(format!(
                    "Unknown log level '{}'. Expected one of TRACE, DEBUG3, DEBUG2, DEBUG1, INFO, WARN, ERROR",
                    s
                ))
            })
    }
}
