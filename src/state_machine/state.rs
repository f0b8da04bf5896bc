//! Conversation state types

use super::Ticket;
use crate::backend::Vendor;

/// Vendor grid inside `AwaitingVendorSelection`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorGrid {
    /// Directory request in flight; grid hidden
    Loading { ticket: Ticket },
    /// Fetched list, never empty; grid visible
    Ready { vendors: Vec<Vendor> },
}

/// Conversation state
///
/// The variants are mutually exclusive, so a pending itinerary decision and
/// a visible vendor grid can never coexist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Ready for user input, no pending affordance
    #[default]
    Idle,

    /// Assistant request in flight
    AwaitingAssistantReply { ticket: Ticket },

    /// Assistant produced an itinerary; Yes/No prompt visible
    AwaitingItineraryDecision,

    /// Itinerary confirmed; vendors loading or shown for selection
    AwaitingVendorSelection { grid: VendorGrid },
}

impl ConvState {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingAssistantReply { .. } => "awaiting_assistant_reply",
            ConvState::AwaitingItineraryDecision => "awaiting_itinerary_decision",
            ConvState::AwaitingVendorSelection {
                grid: VendorGrid::Loading { .. },
            } => "loading_vendors",
            ConvState::AwaitingVendorSelection {
                grid: VendorGrid::Ready { .. },
            } => "awaiting_vendor_selection",
        }
    }

    /// Whether the Yes/No affordance is visible
    pub fn decision_pending(&self) -> bool {
        matches!(self, ConvState::AwaitingItineraryDecision)
    }

    /// Vendors currently displayed for selection, if the grid is visible
    pub fn vendor_grid(&self) -> Option<&[Vendor]> {
        match self {
            ConvState::AwaitingVendorSelection {
                grid: VendorGrid::Ready { vendors },
            } => Some(vendors),
            _ => None,
        }
    }

    /// Whether a network request is outstanding for the current state
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            ConvState::AwaitingAssistantReply { .. }
                | ConvState::AwaitingVendorSelection {
                    grid: VendorGrid::Loading { .. }
                }
        )
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub session_id: String,
    /// Category requested when the user confirms an itinerary
    pub vendor_type: String,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>, vendor_type: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            vendor_type: vendor_type.into(),
        }
    }
}
