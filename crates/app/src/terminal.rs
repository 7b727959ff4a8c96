use std::io::Write;

use async_trait::async_trait;
use services::{BridgeError, HostBridge};

/// Host bridge for a plain terminal: popups and links are printed, nothing else
/// is available.
#[derive(Debug, Default)]
pub struct TerminalBridge;

impl TerminalBridge {
    fn print(&self, text: &str) -> Result<(), BridgeError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}").map_err(|err| BridgeError::Failed(err.to_string()))
    }
}

#[async_trait]
impl HostBridge for TerminalBridge {
    fn show_popup(&self, title: &str, message: &str) -> Result<(), BridgeError> {
        self.print(&format!("  {title}  {message}"))
    }

    fn alert(&self, message: &str) -> Result<(), BridgeError> {
        self.print(message)
    }

    fn open_link(&self, url: &str) -> Result<(), BridgeError> {
        self.print(&format!("Open this link to share your result:\n  {url}"))
    }
}
