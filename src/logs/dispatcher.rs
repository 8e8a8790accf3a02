use crate::error::Result;
use crate::logs::{Level, LogRecord, RotatingFileSink};
use std::fmt::Display;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback invoked with every record that passes the threshold
pub type Sink = Arc<dyn Fn(&LogRecord) + Send + Sync>;

/// Dispatcher filters records by severity and fans them out to its sinks
///
/// Sinks run synchronously on the calling thread, in registration order,
/// while the registry lock is held. A sink must not call `register_sink`,
/// `clear_sinks` or `replace_sinks` on the dispatcher that is invoking it:
/// that deadlocks. Panics raised by a sink are not caught.
pub struct Dispatcher {
    /// Component name stamped on records built by the level helpers
    component: String,
    /// Minimum level delivered to sinks
    threshold: AtomicU8,
    /// Registered sinks, in invocation order
    sinks: Mutex<Vec<Sink>>,
}

impl Dispatcher {
    /// Create a dispatcher with no sinks
    pub fn new(component: impl Into<String>, threshold: Level) -> Self {
        Self {
            component: component.into(),
            threshold: AtomicU8::new(threshold.as_u8()),
            sinks: Mutex::new(Vec::new()),
        }
    }

    /// Get the component name
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Set the minimum level delivered to sinks
    pub fn set_threshold(&self, level: Level) {
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Get the minimum level delivered to sinks
    pub fn threshold(&self) -> Level {
        Level::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    /// Whether a record at `level` would reach the sinks
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.threshold()
    }

    /// Append a sink to the registry
    pub fn register_sink(&self, sink: Sink) {
        self.lock_sinks().push(sink);
    }

    /// Remove every registered sink
    pub fn clear_sinks(&self) {
        self.lock_sinks().clear();
    }

    /// Replace every registered sink with `sink`
    pub fn replace_sinks(&self, sink: Sink) {
        let mut sinks = self.lock_sinks();
        sinks.clear();
        sinks.push(sink);
    }

    /// Number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.lock_sinks().len()
    }

    /// Open a rotating file sink and register it
    ///
    /// The returned handle can be used to inspect the sink; the registry
    /// keeps its own reference.
    pub fn register_rotating_file<P: AsRef<Path>>(
        &self,
        path: P,
        max_size: u64,
        max_backups: usize,
    ) -> Result<Arc<RotatingFileSink>> {
        let sink = Arc::new(RotatingFileSink::new(path, max_size, max_backups)?);
        self.register_sink(sink.into_sink());
        Ok(sink)
    }

    /// Build a record and deliver it to every sink if it passes the threshold
    pub fn dispatch(
        &self,
        level: Level,
        component: &str,
        function: &str,
        line: u32,
        message: &str,
    ) {
        if !self.enabled(level) {
            return;
        }

        let record = LogRecord::new(level, component, function, line, message);

        let sinks = self.lock_sinks();
        for sink in sinks.iter() {
            sink(&record);
        }
    }

    /// Log `message` under this dispatcher's component name
    pub fn log(&self, level: Level, function: &str, line: u32, message: impl Display) {
        // Skip rendering for filtered records
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, &self.component, function, line, &message.to_string());
    }

    /// Log `message` at TRACE
    pub fn trace(&self, function: &str, line: u32, message: impl Display) {
        self.log(Level::Trace, function, line, message);
    }

    /// Log `message` at DEBUG3
    pub fn debug3(&self, function: &str, line: u32, message: impl Display) {
        self.log(Level::Debug3, function, line, message);
    }

    /// Log `message` at DEBUG2
    pub fn debug2(&self, function: &str, line: u32, message: impl Display) {
        self.log(Level::Debug2, function, line, message);
    }

    /// Log `message` at DEBUG1
    pub fn debug1(&self, function: &str, line: u32, message: impl Display) {
        self.log(Level::Debug1, function, line, message);
    }

    /// Log `message` at INFO
    pub fn info(&self, function: &str, line: u32, message: impl Display) {
        self.log(Level::Info, function, line, message);
    }

    /// Log `message` at WARN
    pub fn warn(&self, function: &str, line: u32, message: impl Display) {
        self.log(Level::Warn, function, line, message);
    }

    /// Log `message` at ERROR
    pub fn error(&self, function: &str, line: u32, message: impl Display) {
        self.log(Level::Error, function, line, message);
    }

    fn lock_sinks(&self) -> MutexGuard<'_, Vec<Sink>> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
