//! Error types

mod config;
mod diagnostic;
mod validation;

pub use config::*;
pub use diagnostic::*;
pub use validation::*;
