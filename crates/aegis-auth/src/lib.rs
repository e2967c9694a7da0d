//! AEGIS Auth Client
//!
//! Translates sign-in and verify intents into HTTP calls against the
//! remote authentication service and normalizes its response envelope
//! (`{status, data|user, message}`) into typed outcomes. One attempt per
//! call; retry policy, if any, belongs to the caller.

mod client;
mod error;
mod types;

pub use client::AuthClient;
pub use error::AuthError;
pub use types::{Credentials, SignInData, VerifiedUser};

pub type Result<T> = std::result::Result<T, AuthError>;
