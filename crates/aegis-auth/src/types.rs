//! Wire types for the remote authentication service

use serde::{Deserialize, Serialize};

/// Sign-in request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Payload of a successful sign-in: the full session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInData {
    pub token: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Payload of a successful token verification. The remote refreshes only
/// the identity fields; the role is whatever was stored at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub email: String,
    pub name: String,
}

/// Response envelope for `POST /api/v1/auth/signin`.
#[derive(Debug, Deserialize)]
pub(crate) struct SignInEnvelope {
    pub status: String,
    pub data: Option<SignInData>,
    pub message: Option<String>,
}

/// Response envelope for `GET /api/v1/auth/verifytoken`.
#[derive(Debug, Deserialize)]
pub(crate) struct VerifyEnvelope {
    pub status: String,
    pub user: Option<VerifiedUser>,
    pub message: Option<String>,
}
