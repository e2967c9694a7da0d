//! AEGIS Session Management
//!
//! The session is the only persistent entity: four string-valued keys
//! (`token`, `email`, `name`, `role`) in extension-scoped local storage.
//! A present token is a provisional signal only; the coordinator decides
//! logged-in state by verifying it against the remote service.

mod error;
mod session;
mod store;

pub use error::SessionError;
pub use session::{Session, UserProfile};
pub use store::SessionStore;

pub type Result<T> = std::result::Result<T, SessionError>;
