//! Events that can occur in a conversation

use crate::backend::{AssistantReply, Vendor};
use std::fmt;

/// Sequence number attached to an outgoing request
///
/// Each request class (assistant replies, vendor fetches) has its own
/// monotonically increasing counter. A result is applied only if its ticket
/// is the one the current state is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets for one request class
#[derive(Debug, Default)]
pub struct TicketCounter {
    last: u64,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.last += 1;
        Ticket(self.last)
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage {
        text: String,
        ticket: Ticket,
    },
    ItineraryConfirmed {
        ticket: Ticket,
    },
    ItineraryDeclined,
    VendorSelected {
        index: usize,
    },

    // Assistant service events
    AssistantReplied {
        ticket: Ticket,
        reply: AssistantReply,
    },
    AssistantFailed {
        ticket: Ticket,
        message: String,
    },

    // Vendor directory events
    VendorsFetched {
        ticket: Ticket,
        vendors: Vec<Vendor>,
    },
    VendorFetchFailed {
        ticket: Ticket,
        message: String,
    },
}

impl Event {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserMessage { .. } => "user_message",
            Event::ItineraryConfirmed { .. } => "itinerary_confirmed",
            Event::ItineraryDeclined => "itinerary_declined",
            Event::VendorSelected { .. } => "vendor_selected",
            Event::AssistantReplied { .. } => "assistant_replied",
            Event::AssistantFailed { .. } => "assistant_failed",
            Event::VendorsFetched { .. } => "vendors_fetched",
            Event::VendorFetchFailed { .. } => "vendor_fetch_failed",
        }
    }
}
