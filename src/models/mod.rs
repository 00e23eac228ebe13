//! Data models

pub mod advisory;
pub mod incident;
pub mod prediction;

pub use advisory::*;
pub use incident::*;
pub use prediction::*;
