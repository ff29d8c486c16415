use crate::domains::logger::{DomainLogger, FileLogger};
use log::LevelFilter;
use std::sync::Arc;

/// Install the fast_log file backend and hand back a logger the application can inject.
pub fn init_file_logger(path: &str) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, LevelFilter::Info)
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileLogger))
}
