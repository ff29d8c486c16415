use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Everything goes to stderr so stdout stays reserved for trajectory output.
struct ConsoleBridge;

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) { eprintln!("# {}", msg); }
    fn warn(&self, msg: &str) { eprintln!("# WARN: {}", msg); }
    fn error(&self, msg: &str) { eprintln!("# ERROR: {}", msg); }
}

/// Initialize a console-backed DomainLogger (the fallback when no log file is configured)
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge {})
}
