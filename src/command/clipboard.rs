use std::sync::{Mutex, OnceLock};

use arboard::Clipboard;
use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::command::Command;

/// Linux clipboards only keep their contents while the owning handle stays
/// alive, so one handle is shared for the whole process and created lazily
/// on the first copy.
static CLIPBOARD: OnceLock<Mutex<Option<Clipboard>>> = OnceLock::new();

/// Copies a string to the system clipboard and flashes a confirmation.
pub struct CopyTextCmd {
    text: String,
    label: String,
}

impl CopyTextCmd {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

#[async_trait]
impl Command for CopyTextCmd {
    fn name(&self) -> String {
        format!("Copying {}", self.label)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        place_in_clipboard(self.text)?;
        action_tx.send(AppMessage::Flash(format!("Copied {}", self.label)))?;
        Ok(())
    }
}

fn place_in_clipboard(text: String) -> Result<()> {
    let mut guard = CLIPBOARD
        .get_or_init(|| Mutex::new(None))
        .lock()
        .map_err(|_| color_eyre::eyre::eyre!("clipboard handle poisoned"))?;
    if guard.is_none() {
        *guard = Some(Clipboard::new()?);
    }
    if let Some(clipboard) = guard.as_mut() {
        clipboard.set_text(text)?;
    }
    Ok(())
}
