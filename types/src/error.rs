//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for lockvote.
#[derive(Debug, Error)]
pub enum LockvoteError {
    #[error("invalid voter id: {0:?}")]
    InvalidVoterId(String),

    #[error("invalid locking parameters: {0}")]
    InvalidParams(String),

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}
