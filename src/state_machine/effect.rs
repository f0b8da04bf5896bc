//! Effects produced by state transitions

use super::Ticket;
use crate::backend::Vendor;
use crate::transcript::Message;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage { message: Message },

    /// Empty the composer
    ClearComposer,

    /// Send the current transcript to the assistant service
    RequestReply { ticket: Ticket },

    /// Ask the vendor directory for one category
    FetchVendors { ticket: Ticket, vendor_type: String },

    /// Replace the selected vendor
    RecordSelection { vendor: Vendor },
}

impl Effect {
    pub fn user_says(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: Message::user(text),
        }
    }

    pub fn assistant_says(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: Message::assistant(text),
        }
    }
}
