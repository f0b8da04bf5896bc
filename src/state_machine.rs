//! Conversation controller state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{Event, Ticket, TicketCounter};
pub use state::{ConvContext, ConvState, VendorGrid};
pub use transition::{transition, TransitionError, TransitionResult};
