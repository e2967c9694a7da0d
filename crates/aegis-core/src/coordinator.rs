//! Background Coordinator
//!
//! Single authority for session mutation and content-bridge presence.
//! Every failure is recovered here and mapped to a reply shape; nothing
//! propagates across a context boundary, because an uncaught rejection in
//! one context does not report into another.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use aegis_auth::{AuthClient, AuthError, Credentials, SignInData};
use aegis_bridge::{BridgeEvent, BridgeRequest, BridgeResponse, TabId};
use aegis_session::{Session, SessionStore, UserProfile};
use aegis_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::notify::{Notification, Notifier};
use crate::tabs::{TabDescriptor, TabGateway};
use crate::Result;

/// What a network or parse failure reads as to the user. The real cause
/// is in the logs; the popup only needs to know the attempt went nowhere.
const GENERIC_SIGNIN_ERROR: &str = "Uncaught error. Please try again";

#[derive(Debug, Clone, Serialize)]
pub struct SignInReply {
    pub success: bool,
    pub data: Option<SignInData>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckAuthReply {
    pub is_logged_in: bool,
    pub user: Option<UserProfile>,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LogoutReply {
    pub success: bool,
}

pub struct Coordinator {
    store: SessionStore,
    auth: AuthClient,
    tabs: Arc<dyn TabGateway>,
    notifier: Arc<dyn Notifier>,
    injection_settle: Duration,
}

impl Coordinator {
    pub fn new(
        config: &Config,
        tabs: Arc<dyn TabGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db, tabs, notifier))
    }

    pub fn with_database(
        config: &Config,
        db: Database,
        tabs: Arc<dyn TabGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        if config.api_base_url.scheme() != "https" {
            tracing::warn!(
                url = %config.api_base_url,
                "Auth service URL is not HTTPS; credentials travel in the clear"
            );
        }

        Self {
            store: SessionStore::new(db),
            auth: AuthClient::new(config.api_base_url.clone()),
            tabs,
            notifier,
            injection_settle: config.injection_settle,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // === Lifecycle ===

    /// Install hook: a diagnostic read of the current auth state. No
    /// mutation, just a log line.
    pub fn on_installed(&self) {
        match self.store.token() {
            Ok(token) => tracing::info!(
                state = if token.is_some() { "logged in" } else { "not logged in" },
                "Authentication state initialized"
            ),
            Err(e) => tracing::warn!(error = %e, "Could not read auth state on install"),
        }
    }

    /// Startup hook: verify the stored token proactively so a stale
    /// session is invalidated before any UI asks about it.
    pub async fn on_startup(&self) {
        if let Err(e) = self.verify_token().await {
            tracing::error!(error = %e, "Startup token verification failed");
        }
    }

    // === Session operations ===

    /// Exchange credentials for a session. The originating tab, if any,
    /// gets a fire-and-forget outcome event in addition to the reply.
    pub async fn sign_in(&self, credentials: Credentials, tab: Option<TabId>) -> SignInReply {
        match self.auth.sign_in(&credentials).await {
            Ok(data) => {
                let session = Session::new(
                    data.token.clone(),
                    data.email.clone(),
                    data.name.clone(),
                    data.role.clone(),
                );
                if let Err(e) = self.store.put_session(&session) {
                    tracing::error!(error = %e, "Failed to persist session");
                    return self
                        .sign_in_failure(tab, GENERIC_SIGNIN_ERROR.to_string())
                        .await;
                }

                if let Some(tab) = tab {
                    self.tabs
                        .send_event(tab, BridgeEvent::SignInSucceeded { data: data.clone() })
                        .await;
                }

                tracing::info!(email = %data.email, "Signed in");
                SignInReply {
                    success: true,
                    data: Some(data),
                    message: None,
                }
            }
            Err(AuthError::Rejected { message }) => self.sign_in_failure(tab, message).await,
            Err(e) => {
                tracing::error!(error = %e, "Error in signing in");
                self.sign_in_failure(tab, GENERIC_SIGNIN_ERROR.to_string())
                    .await
            }
        }
    }

    async fn sign_in_failure(&self, tab: Option<TabId>, message: String) -> SignInReply {
        if let Some(tab) = tab {
            self.tabs
                .send_event(
                    tab,
                    BridgeEvent::SignInFailed {
                        message: message.clone(),
                    },
                )
                .await;
        }

        SignInReply {
            success: false,
            data: None,
            message: Some(message),
        }
    }

    /// Check the stored token against the remote. No token means
    /// not-logged-in without a network call. Any rejection or error
    /// clears the whole session: this is the single place a stale token
    /// gets invalidated.
    pub async fn verify_token(&self) -> Result<bool> {
        let Some(token) = self.store.token()? else {
            return Ok(false);
        };

        match self.auth.verify_token(&token).await {
            Ok(user) => {
                self.store.refresh_identity(&user.email, &user.name)?;
                Ok(true)
            }
            Err(e) => {
                if e.is_rejection() {
                    tracing::debug!("Stored token rejected by remote");
                } else {
                    tracing::error!(error = %e, "Error verifying token");
                }
                self.store.clear()?;
                Ok(false)
            }
        }
    }

    /// Auth state for the popup. Always re-verifies; never trusts a
    /// cached logged-in flag.
    pub async fn check_auth(&self) -> CheckAuthReply {
        match self.check_auth_inner().await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "Error checking auth");
                CheckAuthReply {
                    is_logged_in: false,
                    user: None,
                    success: false,
                }
            }
        }
    }

    async fn check_auth_inner(&self) -> Result<CheckAuthReply> {
        if self.verify_token().await? {
            Ok(CheckAuthReply {
                is_logged_in: true,
                user: self.store.profile()?,
                success: true,
            })
        } else {
            Ok(CheckAuthReply {
                is_logged_in: false,
                user: None,
                success: true,
            })
        }
    }

    /// Unconditional session clear. Always reports success; clearing an
    /// already-empty session is not a failure.
    pub async fn logout(&self) -> LogoutReply {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Error clearing session on logout");
        }
        LogoutReply { success: true }
    }

    // === Bridge presence ===

    /// Toolbar icon click: best effort, never an error to the caller.
    pub async fn on_icon_clicked(&self, tab: &TabDescriptor) {
        if tab.is_restricted() {
            tracing::info!(tab_id = %tab.id, url = %tab.url, "Cannot inject into this page");
            self.notifier.notify(Notification::inject_error());
            return;
        }

        if let Err(e) = self.ensure_bridge(tab.id).await {
            if e.is_restricted_url() {
                self.notifier.notify(Notification::inject_error());
            }
            tracing::warn!(tab_id = %tab.id, error = %e, "Could not ensure content bridge");
            return;
        }

        if let Err(e) = self
            .tabs
            .request(tab.id, BridgeRequest::TogglePanel)
            .await
        {
            tracing::warn!(tab_id = %tab.id, error = %e, "Error sending toggle message");
        }
    }

    /// Injection protocol: probe with `Ping`; a `Pong` means the bridge
    /// is already listening. On channel failure, inject and then wait the
    /// settle delay so the new bridge can register its listener before
    /// any follow-up message. The delay is a heuristic; a slow page can
    /// still race.
    async fn ensure_bridge(&self, tab: TabId) -> std::result::Result<(), crate::tabs::GatewayError> {
        match self.tabs.request(tab, BridgeRequest::Ping).await {
            Ok(BridgeResponse::Pong) => return Ok(()),
            Ok(other) => {
                tracing::warn!(tab_id = %tab, ?other, "Unexpected ping reply; treating bridge as present");
                return Ok(());
            }
            Err(_) => {}
        }

        tracing::info!(tab_id = %tab, "Injecting content bridge");
        self.tabs.inject(tab).await?;
        tokio::time::sleep(self.injection_settle).await;
        Ok(())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
