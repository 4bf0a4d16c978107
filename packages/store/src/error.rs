use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("A user with this email already exists")]
    EmailTaken,

    /// All 900 three-digit codes for the role are assigned.
    #[error("No free {0} codes remain")]
    IdSpaceExhausted(&'static str),
}
