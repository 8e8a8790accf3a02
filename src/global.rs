// Process-wide default dispatcher

use crate::logs::{Dispatcher, Level};
use std::sync::OnceLock;

/// Component name used when the default dispatcher is created lazily
pub const DEFAULT_COMPONENT: &str = "Logger";

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// Initialize the process-wide dispatcher
///
/// Only the first initialization takes effect; later calls, and calls made
/// after `logger()` already created the default, return the existing
/// dispatcher unchanged.
pub fn init(component: &str, threshold: Level) -> &'static Dispatcher {
    GLOBAL.get_or_init(|| Dispatcher::new(component, threshold))
}

/// Get the process-wide dispatcher, creating a default one if needed
pub fn logger() -> &'static Dispatcher {
    GLOBAL.get_or_init(|| Dispatcher::new(DEFAULT_COMPONENT, Level::Info))
}
