//! Error types for the growth simulation.

use thiserror::Error;

/// Main error type for the simulation.
///
/// Configuration problems are caught when the engine is built; the only
/// failure that can happen while growing is sampler starvation.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("sampling exhausted: no admissible point after {attempts} attempts")]
    SamplingExhausted { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
