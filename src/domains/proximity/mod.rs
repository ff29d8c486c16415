pub mod graph;
pub mod metrics;
pub mod orchestrator;
pub mod ports;
pub mod spe;
pub mod types;

pub use graph::*;
pub use metrics::*;
pub use orchestrator::*;
pub use ports::*;
pub use spe::*;
pub use types::*;
