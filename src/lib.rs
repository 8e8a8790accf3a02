// Library exports for rotalog

pub mod cli;
pub mod config;
pub mod error;
pub mod global;
pub mod logs;

pub use error::{LogError, Result};
pub use logs::{Dispatcher, Level, LogRecord, RotatingFileSink, Sink};
