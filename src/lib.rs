//! Trip chat - terminal client for a travel-planning assistant
//!
//! A conversation controller built as a pure state machine, driven by an
//! async runtime that talks to the assistant service and vendor directory.

pub mod backend;
pub mod config;
pub mod onboarding;
pub mod runtime;
pub mod state_machine;
pub mod transcript;
pub mod tui;
