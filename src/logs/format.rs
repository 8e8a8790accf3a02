// Line formatters for file sinks

use crate::logs::LogRecord;
use std::sync::Arc;

/// Renders a record into a single line without the trailing newline
pub type Formatter = Arc<dyn Fn(&LogRecord) -> String + Send + Sync>;

/// Full-field layout:
/// `[timestamp][LEVEL ][component][function:line        ] message`
pub fn default_formatter(record: &LogRecord) -> String {
    let origin = format!("{}:{}", record.function, record.line);
    format!(
        "[{}][{:<6}][{}][{:<20}] {}",
        record.timestamp, record.level, record.component, origin, record.message
    )
}

/// Only the message text
pub fn message_only(record: &LogRecord) -> String {
    record.message.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::Level;

    fn record() -> LogRecord {
        LogRecord::with_timestamp(
            "2024-01-02 03:04:05.006007",
            Level::Warn,
            "net",
            "connect",
            42,
            "retrying",
        )
    }

    #[test]
    fn test_default_formatter_layout() {
        assert_eq!(
            default_formatter(&record()),
            "[2024-01-02 03:04:05.006007][WARN  ][net][connect:42          ] retrying"
        );
    }

    #[test]
    fn test_default_formatter_long_origin_not_truncated() {
        let mut rec = record();
        rec.function = "a_really_long_function_name".to_string();
        let line = default_formatter(&rec);
        assert!(line.contains("[a_really_long_function_name:42] retrying"));
    }

    #[test]
    fn test_message_only() {
        assert_eq!(message_only(&record()), "retrying");
    }
}
