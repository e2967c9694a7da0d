//! AEGIS Runtime
//!
//! Wires the coordinator, the tab gateway and the popup together over
//! channels: one long-lived background task owns the coordinator, one
//! task per injected tab owns that tab's content bridge.

mod background;
mod gateway;
mod password;
mod popup;

use std::sync::Arc;

use aegis_core::{Config, Coordinator, LogNotifier};

pub use background::{spawn_background, BackgroundCommand, BackgroundHandle, RuntimeError};
pub use gateway::{BridgeStatus, ChannelTabs};
pub use password::validate_password;
pub use popup::{Popup, PopupView, PASSWORD_POLICY_ERROR};

/// A fully wired extension runtime.
pub struct Runtime {
    background: BackgroundHandle,
    tabs: Arc<ChannelTabs>,
}

impl Runtime {
    pub fn start(config: &Config) -> aegis_core::Result<Self> {
        let tabs = Arc::new(ChannelTabs::new());
        let coordinator = Coordinator::new(config, tabs.clone(), Arc::new(LogNotifier))?;
        let background = spawn_background(coordinator);

        Ok(Self { background, tabs })
    }

    pub fn background(&self) -> BackgroundHandle {
        self.background.clone()
    }

    pub fn tabs(&self) -> Arc<ChannelTabs> {
        self.tabs.clone()
    }
}
