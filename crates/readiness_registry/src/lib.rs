//! Thread-safe registry of component readiness flags.

use thiserror::Error;

pub mod observability;
pub mod registry;
pub mod value;

pub use observability::RegistrySummary;
pub use registry::ReadinessRegistry;
pub use value::{ValueParsing, parse_ready_value};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("invalid readiness value: {0:?}")]
    InvalidValue(String),
    #[error("configuration error: {0}")]
    Config(String),
}
