//! Auth error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Network or transport failure before a body could be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered, but the body was not the expected envelope.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The remote reported `status != "success"`.
    #[error("{message}")]
    Rejected { message: String },
}

impl AuthError {
    /// True when the remote itself rejected the request, as opposed to the
    /// call failing to complete.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthError::Rejected { .. })
    }
}
