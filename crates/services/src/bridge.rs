use async_trait::async_trait;
use tracing::debug;

use crate::error::BridgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    Success,
    Error,
    Light,
}

/// Capabilities offered by the chat-platform host.
///
/// Every capability is optional: the defaults report `Unsupported`, and
/// callers degrade instead of failing.
#[async_trait]
pub trait HostBridge: Send + Sync {
    fn ready(&self) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("ready"))
    }

    fn expand(&self) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("expand"))
    }

    fn haptic(&self, _kind: HapticKind) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("haptic feedback"))
    }

    fn show_popup(&self, _title: &str, _message: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("popups"))
    }

    /// Plain alert, the fallback when popups are missing.
    fn alert(&self, _message: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("alerts"))
    }

    fn open_link(&self, _url: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("external links"))
    }

    async fn native_share(&self, _text: &str, _url: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("native share"))
    }

    async fn copy_to_clipboard(&self, _text: &str) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("clipboard"))
    }
}

/// Host without any capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessBridge;

impl HostBridge for HeadlessBridge {}

/// Signal readiness and ask the host for the full viewport.
pub fn initialize(bridge: &dyn HostBridge) {
    if let Err(err) = bridge.ready().and_then(|()| bridge.expand()) {
        debug!(%err, "host initialization skipped");
    }
}

pub fn haptic(bridge: &dyn HostBridge, kind: HapticKind) {
    if let Err(err) = bridge.haptic(kind) {
        debug!(%err, ?kind, "haptic feedback skipped");
    }
}

/// Show a popup, falling back to an alert. Failures are swallowed.
pub fn notify(bridge: &dyn HostBridge, title: &str, message: &str) {
    let Err(err) = bridge.show_popup(title, message) else {
        return;
    };
    debug!(%err, "popup unavailable, falling back to alert");
    if let Err(err) = bridge.alert(&format!("{title}\n\n{message}")) {
        debug!(%err, "alert unavailable");
    }
}
