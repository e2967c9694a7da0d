//! Popup state machine
//!
//! The popup never holds auth state of its own: every view it shows is
//! derived from a fresh `check_auth` round trip. A successful login does
//! not flip the view directly; it triggers a re-query, so the coordinator
//! stays the single source of truth.

use aegis_core::{Credentials, TabId, UserProfile};

use crate::background::BackgroundHandle;
use crate::password::validate_password;

pub const PASSWORD_POLICY_ERROR: &str = "Minimum eight characters, at least one uppercase letter, one lowercase letter, one number and one special character (@$!%*?&) is required for password";

const LOGIN_FAILED_ERROR: &str = "Login failed. Please try again.";
const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupView {
    /// Opened but the auth query has not resolved yet.
    Loading,
    Login { error: Option<String> },
    Protected { user: UserProfile },
}

pub struct Popup {
    background: BackgroundHandle,
    view: PopupView,
}

impl Popup {
    pub fn new(background: BackgroundHandle) -> Self {
        Self {
            background,
            view: PopupView::Loading,
        }
    }

    pub fn view(&self) -> &PopupView {
        &self.view
    }

    pub async fn open(&mut self) {
        self.refresh().await;
    }

    /// Validate locally, then hand the credentials to the coordinator. A
    /// policy violation never reaches the network.
    pub async fn submit_login(&mut self, email: &str, password: &str, tab: Option<TabId>) {
        if !validate_password(password) {
            self.view = PopupView::Login {
                error: Some(PASSWORD_POLICY_ERROR.to_string()),
            };
            return;
        }

        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.background.sign_in(credentials, tab).await {
            Ok(reply) if reply.success => self.refresh().await,
            Ok(reply) => {
                self.view = PopupView::Login {
                    error: Some(reply.message.unwrap_or_else(|| LOGIN_FAILED_ERROR.to_string())),
                };
            }
            Err(e) => {
                tracing::error!(error = %e, "Sign-in request failed");
                self.view = PopupView::Login {
                    error: Some(UNEXPECTED_ERROR.to_string()),
                };
            }
        }
    }

    /// Like login, logout never trusts the echoed reply: the view after a
    /// logout is whatever a fresh `check_auth` says it is.
    pub async fn logout(&mut self) {
        if let Err(e) = self.background.logout().await {
            tracing::error!(error = %e, "Logout request failed");
        }
        self.refresh().await;
    }

    async fn refresh(&mut self) {
        self.view = match self.background.check_auth().await {
            Ok(reply) => match (reply.is_logged_in, reply.user) {
                (true, Some(user)) => PopupView::Protected { user },
                _ => PopupView::Login { error: None },
            },
            Err(e) => {
                tracing::error!(error = %e, "Auth check failed");
                PopupView::Login { error: None }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{handle_pair, BackgroundCommand, BackgroundHandle};
    use aegis_core::{CheckAuthReply, LogoutReply};

    fn profile() -> UserProfile {
        UserProfile {
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            role: "doctor".to_string(),
        }
    }

    /// A background whose logout reports success while its session
    /// survives, as when the store clear fails inside the coordinator.
    fn background_with_surviving_session() -> BackgroundHandle {
        let (handle, mut rx) = handle_pair();
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    BackgroundCommand::Logout { reply } => {
                        let _ = reply.send(LogoutReply { success: true });
                    }
                    BackgroundCommand::CheckAuth { reply } => {
                        let _ = reply.send(CheckAuthReply {
                            is_logged_in: true,
                            user: Some(profile()),
                            success: true,
                        });
                    }
                    _ => {}
                }
            }
        });
        handle
    }

    #[tokio::test]
    async fn test_logout_view_comes_from_requery_not_reply() {
        let mut popup = Popup::new(background_with_surviving_session());

        popup.logout().await;

        // The reply said success, but the re-queried auth state wins.
        assert_eq!(*popup.view(), PopupView::Protected { user: profile() });
    }
}
