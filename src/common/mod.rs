pub mod error;
pub mod geometry;

pub use error::*;
pub use geometry::*;
