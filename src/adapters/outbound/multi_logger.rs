use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans every message out to a list of sinks, in order. With no sinks it
/// swallows everything.
#[derive(Default)]
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }

    pub fn with(mut self, sink: DynLogger) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }

    fn flush(&self) {
        self.sinks.iter().for_each(|s| s.flush());
    }
}

/// Silent logger for tests.
pub fn init_noop_logger() -> DynLogger {
    Arc::new(MultiLogger::default())
}

/// Console logger, plus the file logger when `path` is given. A file logger
/// that fails to initialize is reported on the console and left out.
pub fn init_run_logger(path: Option<&str>) -> DynLogger {
    let console = super::init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match super::init_file_logger(path) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![file_logger, console])) as DynLogger,
        Err(e) => {
            console.warn(&e);
            console
        }
    }
}
