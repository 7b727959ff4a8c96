use std::sync::Arc;

use quiz_core::model::encode_payload;
use tracing::{debug, info};
use url::Url;

use crate::bridge::{HostBridge, notify};
use crate::error::BridgeError;
use crate::sessions::SessionOutcome;

/// Deep link the encoded payload is appended to.
pub const DEFAULT_SHARE_LINK: &str = "https://t.me/museum_quiz_bot/app?startapp=";

/// Platform share dialog; receives `url` and `text` query parameters.
pub const SHARE_DIALOG_URL: &str = "https://t.me/share/url";

/// Text and link composed for one finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    pub payload: String,
    pub link: String,
    pub text: String,
}

impl ShareMessage {
    #[must_use]
    pub fn for_outcome(outcome: &SessionOutcome, link_base: &str) -> Self {
        let payload = encode_payload(outcome.correct, outcome.total);
        let link = format!("{link_base}{payload}");
        let text = format!(
            "I scored {}/{} ({}%) in the museum quiz. Best streak: {}.",
            outcome.correct, outcome.total, outcome.accuracy_percent, outcome.best_streak
        );
        Self {
            payload,
            link,
            text,
        }
    }

    /// Share-dialog URL carrying the link and text.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the dialog base URL is invalid.
    pub fn dialog_url(&self) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            SHARE_DIALOG_URL,
            &[("url", self.link.as_str()), ("text", self.text.as_str())],
        )
    }

    #[must_use]
    pub fn clipboard_text(&self) -> String {
        format!("{}\n{}", self.text, self.link)
    }
}

/// Delivery channels, tried in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareStrategy {
    Native,
    Dialog,
    Clipboard,
}

impl ShareStrategy {
    pub const RANKED: [ShareStrategy; 3] = [
        ShareStrategy::Native,
        ShareStrategy::Dialog,
        ShareStrategy::Clipboard,
    ];

    async fn attempt(self, bridge: &dyn HostBridge, message: &ShareMessage) -> Result<(), BridgeError> {
        match self {
            ShareStrategy::Native => bridge.native_share(&message.text, &message.link).await,
            ShareStrategy::Dialog => {
                let url = message
                    .dialog_url()
                    .map_err(|err| BridgeError::Failed(err.to_string()))?;
                bridge.open_link(url.as_str())
            }
            ShareStrategy::Clipboard => {
                bridge.copy_to_clipboard(&message.clipboard_text()).await?;
                notify(bridge, "Copied", "Result link copied to the clipboard.");
                Ok(())
            }
        }
    }
}

/// Which channel delivered a share, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Delivered(ShareStrategy),
    Unavailable,
}

/// Publishes a finished session through the first working channel.
#[derive(Clone)]
pub struct ShareService {
    bridge: Arc<dyn HostBridge>,
    link_base: String,
    strategies: Vec<ShareStrategy>,
}

impl ShareService {
    #[must_use]
    pub fn new(bridge: Arc<dyn HostBridge>, link_base: impl Into<String>) -> Self {
        Self {
            bridge,
            link_base: link_base.into(),
            strategies: ShareStrategy::RANKED.to_vec(),
        }
    }

    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<ShareStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    #[must_use]
    pub fn message_for(&self, outcome: &SessionOutcome) -> ShareMessage {
        ShareMessage::for_outcome(outcome, &self.link_base)
    }

    /// Try each channel in order; failures fall through and are never surfaced.
    pub async fn share(&self, outcome: &SessionOutcome) -> ShareOutcome {
        let message = self.message_for(outcome);
        for strategy in &self.strategies {
            match strategy.attempt(self.bridge.as_ref(), &message).await {
                Ok(()) => {
                    info!(?strategy, payload = %message.payload, "result shared");
                    return ShareOutcome::Delivered(*strategy);
                }
                Err(err) => debug!(?strategy, %err, "share channel failed"),
            }
        }
        ShareOutcome::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            correct: 7,
            total: 10,
            accuracy_percent: 70,
            best_streak: 4,
        }
    }

    #[test]
    fn message_embeds_payload_in_link() {
        let message = ShareMessage::for_outcome(&outcome(), DEFAULT_SHARE_LINK);
        assert_eq!(message.payload, "7_10");
        assert_eq!(message.link, "https://t.me/museum_quiz_bot/app?startapp=7_10");
        assert!(message.text.contains("7/10 (70%)"));
        assert!(message.clipboard_text().ends_with("\nhttps://t.me/museum_quiz_bot/app?startapp=7_10"));
    }

    #[test]
    fn dialog_url_encodes_link_and_text() {
        let message = ShareMessage::for_outcome(&outcome(), DEFAULT_SHARE_LINK);
        let url = message.dialog_url().unwrap();
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("url".to_owned(), message.link.clone()));
        assert_eq!(pairs[1], ("text".to_owned(), message.text.clone()));
    }
}
