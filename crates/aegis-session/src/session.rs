//! Session data structure

use serde::{Deserialize, Serialize};

/// The authenticated-user record.
///
/// Created whole on sign-in; `email` and `name` are refreshed on token
/// verification; destroyed whole on logout or verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer credential
    pub token: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl Session {
    pub fn new(token: String, email: String, name: String, role: String) -> Self {
        Self {
            token,
            email,
            name,
            role,
        }
    }

    /// The user-facing slice of the session (everything but the credential).
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }
}

/// What the popup shows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub role: String,
}
