//! Browser tab seam
//!
//! The coordinator talks to tabs through this gateway: request/response
//! messages to a tab's bridge, fire-and-forget events, and script
//! injection. A request to a tab with no live bridge fails the way a dead
//! channel fails; that failure is the ping probe's "not injected" signal.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use aegis_bridge::{BridgeEvent, BridgeRequest, BridgeResponse, TabId};

/// Schemes the browser refuses to inject into.
pub const RESTRICTED_SCHEMES: [&str; 3] = ["chrome", "edge", "about"];

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The tab exists but no bridge answered; the channel is dead or was
    /// never opened.
    #[error("No bridge listening in {0}")]
    Unreachable(TabId),

    /// The browser refused the injection. The message is the browser's
    /// own wording (e.g. "Cannot access a chrome:// URL").
    #[error("Injection failed: {0}")]
    Injection(String),
}

impl GatewayError {
    /// Reactive restricted-scheme detection: the browser's rejection
    /// wording rather than our own URL check.
    pub fn is_restricted_url(&self) -> bool {
        matches!(self, GatewayError::Injection(message) if message.contains("Cannot access"))
    }
}

/// What the coordinator knows about a tab when its icon is clicked.
#[derive(Debug, Clone)]
pub struct TabDescriptor {
    pub id: TabId,
    pub url: String,
}

impl TabDescriptor {
    /// Proactive restricted-scheme check. Unparseable URLs count as
    /// restricted; there is nothing to inject into.
    pub fn is_restricted(&self) -> bool {
        match Url::parse(&self.url) {
            Ok(url) => RESTRICTED_SCHEMES.contains(&url.scheme()),
            Err(_) => true,
        }
    }
}

#[async_trait]
pub trait TabGateway: Send + Sync {
    /// Send a request to the tab's bridge and wait for its reply.
    async fn request(
        &self,
        tab: TabId,
        request: BridgeRequest,
    ) -> Result<BridgeResponse, GatewayError>;

    /// Deliver a fire-and-forget event. Delivery failures are the
    /// caller's to ignore; there is no reply by contract.
    async fn send_event(&self, tab: TabId, event: BridgeEvent);

    /// Inject the bridge script into the tab.
    async fn inject(&self, tab: TabId) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(url: &str) -> TabDescriptor {
        TabDescriptor {
            id: TabId(1),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_restricted_schemes() {
        assert!(tab("chrome://settings").is_restricted());
        assert!(tab("edge://flags").is_restricted());
        assert!(tab("about:blank").is_restricted());
        assert!(!tab("https://example.com").is_restricted());
        assert!(!tab("http://example.com/page").is_restricted());
    }

    #[test]
    fn test_unparseable_url_is_restricted() {
        assert!(tab("not a url").is_restricted());
        assert!(tab("").is_restricted());
    }

    #[test]
    fn test_reactive_restriction_match() {
        let err = GatewayError::Injection("Cannot access a chrome:// URL".to_string());
        assert!(err.is_restricted_url());

        let err = GatewayError::Injection("frame was removed".to_string());
        assert!(!err.is_restricted_url());

        assert!(!GatewayError::Unreachable(TabId(1)).is_restricted_url());
    }
}
