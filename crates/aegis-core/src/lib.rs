//! AEGIS Core
//!
//! The background coordinator: the single authority for session mutation
//! and content-bridge presence. Everything user-facing talks to it over
//! asynchronous messages; it is the only writer of the session store.

mod config;
mod coordinator;
mod error;
mod notify;
mod tabs;

pub use config::Config;
pub use coordinator::{CheckAuthReply, Coordinator, LogoutReply, SignInReply};
pub use error::CoreError;
pub use notify::{LogNotifier, Notification, Notifier};
pub use tabs::{GatewayError, TabDescriptor, TabGateway, RESTRICTED_SCHEMES};

// Re-export core components
pub use aegis_auth::{AuthClient, AuthError, Credentials, SignInData, VerifiedUser};
pub use aegis_bridge::{
    BridgeEvent, BridgeRequest, BridgeResponse, ContentBridge, FrameAction, FrameId,
    FrameMessage, TabId, Viewport,
};
pub use aegis_session::{Session, SessionError, SessionStore, UserProfile};
pub use aegis_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
