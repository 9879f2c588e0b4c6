//! Async commands for side effects.
//!
//! Commands run outside the main event loop. The intake flow returns them,
//! the app spawns them, and they report back over the message channel.

mod clipboard;
mod location;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

pub use clipboard::CopyTextCmd;
pub use location::AcquireLocationCmd;

use crate::app::AppMessage;

/// An async side effect.
///
/// `execute` consumes the command; anything the rest of the app needs to
/// know goes back through `action_tx`.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logs and failure flashes.
    fn name(&self) -> String;

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()>;
}
