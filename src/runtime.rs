//! Runtime for driving a conversation session
//!
//! The runtime owns the session: transcript, composer, state and the
//! selected vendor. The UI sends `Command`s and renders the
//! `ConversationView` snapshots it receives back.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::backend::Vendor;
use crate::state_machine::{ConvContext, ConvState};
use crate::transcript::Transcript;
use tokio::sync::{broadcast, mpsc};

/// Commands sent from the UI to the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(ComposerEdit),
    Submit,
    ConfirmItinerary,
    DeclineItinerary,
    SelectVendor { index: usize },
}

/// Edits to the composer text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEdit {
    Insert(char),
    Backspace,
    Clear,
    Replace(String),
}

impl ComposerEdit {
    pub fn apply(self, composer: &mut String) {
        match self {
            ComposerEdit::Insert(c) => composer.push(c),
            ComposerEdit::Backspace => {
                composer.pop();
            }
            ComposerEdit::Clear => composer.clear(),
            ComposerEdit::Replace(text) => *composer = text,
        }
    }
}

/// Everything the UI needs to render one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationView {
    pub transcript: Transcript,
    pub composer: String,
    pub state: ConvState,
    pub selected_vendor: Option<Vendor>,
}

/// Events sent to view subscribers
#[derive(Debug, Clone)]
pub enum ViewEvent {
    Snapshot(ConversationView),
    Rejected { reason: String },
}

/// Handle to interact with a running conversation
pub struct ConversationHandle {
    pub command_tx: mpsc::Sender<Command>,
    pub broadcast_tx: broadcast::Sender<ViewEvent>,
}

impl ConversationHandle {
    /// Spawn a runtime task for a new session
    ///
    /// The task ends once every clone of `command_tx` is dropped.
    pub fn spawn<A, V>(context: ConvContext, assistant: A, vendors: V) -> Self
    where
        A: AssistantClient + 'static,
        V: VendorClient + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);

        let runtime = ConversationRuntime::new(
            context,
            assistant,
            vendors,
            command_rx,
            broadcast_tx.clone(),
        );
        tokio::spawn(runtime.run());

        Self {
            command_tx,
            broadcast_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.broadcast_tx.subscribe()
    }
}
