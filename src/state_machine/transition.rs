//! Pure state transition function

use super::{ConvContext, ConvState, Effect, Event, Ticket, VendorGrid};
use crate::backend::Vendor;
use thiserror::Error;

/// Shown when an assistant request fails for any reason
pub const ASSISTANT_FALLBACK: &str = "Something went wrong!";
/// Shown when the vendor directory request fails for any reason
pub const VENDOR_FETCH_FALLBACK: &str = "Couldn't fetch vendors right now.";
/// Shown after every successful vendor fetch, with or without cards
pub const VENDOR_INVITE: &str = "Here are some vendors you might find useful. Tap to select one.";
/// Shown when the user declines the itinerary
pub const DECLINE_ACK: &str = "Alright! Let me know how else I can help.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Discarding result for superseded request {0}")]
    Stale(Ticket),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// Effects are listed in the order the runtime must apply them.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User Message Handling
        // ============================================================

        // Any state + UserMessage -> AwaitingAssistantReply
        // Leaving the decision/grid states hides those affordances.
        (_, Event::UserMessage { text, ticket }) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            Ok(
                TransitionResult::new(ConvState::AwaitingAssistantReply { ticket })
                    .with_effect(Effect::user_says(text))
                    .with_effect(Effect::ClearComposer)
                    .with_effect(Effect::RequestReply { ticket }),
            )
        }

        // ============================================================
        // Assistant Replies
        // ============================================================

        (
            ConvState::AwaitingAssistantReply { ticket: expected },
            Event::AssistantReplied { ticket, reply },
        ) if *expected == ticket => {
            let next = if reply.next_action.is_itinerary() {
                ConvState::AwaitingItineraryDecision
            } else {
                ConvState::Idle
            };
            Ok(TransitionResult::new(next).with_effect(Effect::assistant_says(reply.text)))
        }

        (
            ConvState::AwaitingAssistantReply { ticket: expected },
            Event::AssistantFailed { ticket, .. },
        ) if *expected == ticket => Ok(TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::assistant_says(ASSISTANT_FALLBACK))),

        (_, Event::AssistantReplied { ticket, .. } | Event::AssistantFailed { ticket, .. }) => {
            Err(TransitionError::Stale(ticket))
        }

        // ============================================================
        // Itinerary Decision
        // ============================================================

        (ConvState::AwaitingItineraryDecision, Event::ItineraryConfirmed { ticket }) => Ok(
            TransitionResult::new(ConvState::AwaitingVendorSelection {
                grid: VendorGrid::Loading { ticket },
            })
            .with_effect(Effect::FetchVendors {
                ticket,
                vendor_type: context.vendor_type.clone(),
            }),
        ),

        (ConvState::AwaitingItineraryDecision, Event::ItineraryDeclined) => {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::assistant_says(DECLINE_ACK)))
        }

        // ============================================================
        // Vendor Directory Results
        // ============================================================

        (
            ConvState::AwaitingVendorSelection {
                grid: VendorGrid::Loading { ticket: expected },
            },
            Event::VendorsFetched { ticket, vendors },
        ) if *expected == ticket => Ok(vendors_ready(vendors)),

        (
            ConvState::AwaitingVendorSelection {
                grid: VendorGrid::Loading { ticket: expected },
            },
            Event::VendorFetchFailed { ticket, .. },
        ) if *expected == ticket => Ok(TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::assistant_says(VENDOR_FETCH_FALLBACK))),

        (_, Event::VendorsFetched { ticket, .. } | Event::VendorFetchFailed { ticket, .. }) => {
            Err(TransitionError::Stale(ticket))
        }

        // ============================================================
        // Vendor Selection
        // ============================================================

        (
            ConvState::AwaitingVendorSelection {
                grid: VendorGrid::Ready { vendors },
            },
            Event::VendorSelected { index },
        ) => {
            let vendor = vendors.get(index).ok_or_else(|| {
                TransitionError::InvalidTransition(format!(
                    "No vendor at index {index} (grid has {})",
                    vendors.len()
                ))
            })?;
            Ok(TransitionResult::new(ConvState::Idle).with_effects([
                Effect::RecordSelection {
                    vendor: vendor.clone(),
                },
                Effect::assistant_says(selection_message(vendor)),
            ]))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {}",
            state.name(),
            event.name()
        ))),
    }
}

// An empty list leaves nothing to select, so the grid stays hidden
fn vendors_ready(vendors: Vec<Vendor>) -> TransitionResult {
    let state = if vendors.is_empty() {
        ConvState::Idle
    } else {
        ConvState::AwaitingVendorSelection {
            grid: VendorGrid::Ready { vendors },
        }
    };
    TransitionResult::new(state).with_effect(Effect::assistant_says(VENDOR_INVITE))
}

pub fn selection_message(vendor: &Vendor) -> String {
    format!("You selected: {} from {}", vendor.business_name, vendor.city)
}
