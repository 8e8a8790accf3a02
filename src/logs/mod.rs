// Logs module - Dispatch, formatting and size-based rotation

mod dispatcher;
pub mod format;
mod level;
mod reader;
mod record;
mod writer;

pub use dispatcher::{Dispatcher, Sink};
pub use format::{default_formatter, message_only, Formatter};
pub use level::Level;
pub use reader::{backup_chain, read_last_lines, read_logs, LogReadOptions};
pub use record::{format_timestamp, LogRecord};
pub use writer::{backup_path, RotatingFileSink, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_LOG_SIZE};
