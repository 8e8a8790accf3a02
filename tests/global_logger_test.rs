// The process-wide dispatcher lives in its own test binary

use rotalog::global;
use rotalog::{Level, LogRecord};
use std::sync::{Arc, Mutex};

#[test]
fn test_default_global_logger() {
    let logger = global::logger();
    assert_eq!(logger.component(), global::DEFAULT_COMPONENT);
    assert_eq!(logger.threshold(), Level::Info);

    // Created already, init does not replace it
    let same = global::init("late", Level::Trace);
    assert!(std::ptr::eq(logger, same));
    assert_eq!(same.component(), global::DEFAULT_COMPONENT);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&seen);
    logger.register_sink(Arc::new(move |record: &LogRecord| {
        captured.lock().unwrap().push(record.message.clone());
    }));

    logger.info("main", 1, "shared");
    logger.debug3("main", 2, "hidden");

    assert_eq!(*seen.lock().unwrap(), vec!["shared".to_string()]);
}
