pub mod logger;
pub mod proximity;
pub mod scenario;

pub use logger::*;
pub use proximity::*;
pub use scenario::*;
