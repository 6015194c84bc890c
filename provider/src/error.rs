use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("voter {0} not found")]
    VoterNotFound(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("provider is read-only")]
    ReadOnly,
}
