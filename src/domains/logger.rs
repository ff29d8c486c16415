use chrono::Utc;
use log::{error as log_error, info as log_info, warn as log_warn, LevelFilter};
use std::sync::Arc;

/// Run-level logging port used by the application layer.
/// Infallible from the caller's perspective; the numerical core logs through `tracing`.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);

    /// Blocks until buffered messages have reached their sink.
    fn flush(&self) {}
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Appends run reports to a file through `fast_log`. Stdout is left alone since
/// trajectories may be streamed there.
pub struct FileLogger;

impl FileLogger {
    /// Installs `fast_log` as the process-wide `log` backend. Fails if another
    /// `log` backend is already installed.
    pub fn init(path: &str, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
        fast_log::init(fast_log::config::Config::new().file(path).level(level))?;
        Ok(())
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log_info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    /// `fast_log` writes from a background thread; wait for it to drain.
    fn flush(&self) {
        log::logger().flush();
    }
}
