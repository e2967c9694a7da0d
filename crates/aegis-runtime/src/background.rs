//! Background task
//!
//! One task owns the coordinator and drains a command channel. Commands
//! run to completion in arrival order, so two concurrent sign-ins cannot
//! interleave their store writes.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use aegis_core::{
    CheckAuthReply, Coordinator, Credentials, LogoutReply, SignInReply, TabDescriptor, TabId,
};

const COMMAND_BUFFER: usize = 32;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The background task has exited; no reply is coming.
    #[error("Background task is gone")]
    BackgroundGone,
}

#[derive(Debug)]
pub enum BackgroundCommand {
    SignIn {
        credentials: Credentials,
        tab: Option<TabId>,
        reply: oneshot::Sender<SignInReply>,
    },
    CheckAuth {
        reply: oneshot::Sender<CheckAuthReply>,
    },
    Logout {
        reply: oneshot::Sender<LogoutReply>,
    },
    /// Toolbar click. Fire-and-forget; outcome shows up on the tab.
    IconClicked { tab: TabDescriptor },
}

/// Cloneable sender half of the background channel. Every context that
/// needs the coordinator holds one of these.
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::Sender<BackgroundCommand>,
}

impl BackgroundHandle {
    pub async fn sign_in(
        &self,
        credentials: Credentials,
        tab: Option<TabId>,
    ) -> Result<SignInReply, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(BackgroundCommand::SignIn {
            credentials,
            tab,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| RuntimeError::BackgroundGone)
    }

    pub async fn check_auth(&self) -> Result<CheckAuthReply, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(BackgroundCommand::CheckAuth { reply: reply_tx })
            .await?;
        reply_rx.await.map_err(|_| RuntimeError::BackgroundGone)
    }

    pub async fn logout(&self) -> Result<LogoutReply, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(BackgroundCommand::Logout { reply: reply_tx })
            .await?;
        reply_rx.await.map_err(|_| RuntimeError::BackgroundGone)
    }

    pub async fn icon_clicked(&self, tab: TabDescriptor) -> Result<(), RuntimeError> {
        self.send(BackgroundCommand::IconClicked { tab }).await
    }

    async fn send(&self, command: BackgroundCommand) -> Result<(), RuntimeError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::BackgroundGone)
    }
}

/// Start the background task and return its handle. The task runs the
/// install and startup hooks before accepting commands.
pub fn spawn_background(coordinator: Coordinator) -> BackgroundHandle {
    let (tx, mut rx) = mpsc::channel(COMMAND_BUFFER);

    tokio::spawn(async move {
        coordinator.on_installed();
        coordinator.on_startup().await;

        while let Some(command) = rx.recv().await {
            match command {
                BackgroundCommand::SignIn {
                    credentials,
                    tab,
                    reply,
                } => {
                    let _ = reply.send(coordinator.sign_in(credentials, tab).await);
                }
                BackgroundCommand::CheckAuth { reply } => {
                    let _ = reply.send(coordinator.check_auth().await);
                }
                BackgroundCommand::Logout { reply } => {
                    let _ = reply.send(coordinator.logout().await);
                }
                BackgroundCommand::IconClicked { tab } => {
                    coordinator.on_icon_clicked(&tab).await;
                }
            }
        }

        tracing::debug!("Background command channel closed");
    });

    BackgroundHandle { tx }
}

/// A handle wired to a bare receiver, for driving popup logic against a
/// scripted background.
#[cfg(test)]
pub(crate) fn handle_pair() -> (BackgroundHandle, mpsc::Receiver<BackgroundCommand>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    (BackgroundHandle { tx }, rx)
}
