pub mod path;
pub mod scenarios;
pub mod walker;

pub use path::*;
pub use scenarios::*;
pub use walker::*;
