pub mod console_logger;
pub mod file_logger;
pub mod multi_logger;
pub mod trajectory_writer;

pub use console_logger::*;
pub use file_logger::*;
pub use multi_logger::*;
pub use trajectory_writer::*;
