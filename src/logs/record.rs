use crate::logs::Level;
use chrono::{DateTime, Local};

/// Timestamp layout: `YYYY-MM-DD HH:MM:SS.mmmuuu`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A single log entry as delivered to every sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Wall-clock time the record was built, microsecond precision
    pub timestamp: String,
    /// Severity of the record
    pub level: Level,
    /// Name of the component that emitted the record
    pub component: String,
    /// Function the record originated from
    pub function: String,
    /// Source line the record originated from
    pub line: u32,
    /// Fully formatted message text
    pub message: String,
}

impl LogRecord {
    /// Build a record stamped with the current local time
    pub fn new(
        level: Level,
        component: impl Into<String>,
        function: impl Into<String>,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(
            format_timestamp(&Local::now()),
            level,
            component,
            function,
            line,
            message,
        )
    }

    /// Build a record with an explicit timestamp string
    pub fn with_timestamp(
        timestamp: impl Into<String>,
        level: Level,
        component: impl Into<String>,
        function: impl Into<String>,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            level,
            component: component.into(),
            function: function.into(),
            line,
            message: message.into(),
        }
    }
}

/// Render a timestamp with millisecond and microsecond groups
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}
