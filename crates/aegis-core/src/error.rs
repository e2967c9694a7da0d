//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] aegis_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] aegis_session::SessionError),

    #[error("Auth error: {0}")]
    Auth(#[from] aegis_auth::AuthError),

    #[error("Tab gateway error: {0}")]
    Gateway(#[from] crate::tabs::GatewayError),

    #[error("Configuration error: {0}")]
    Config(String),
}
