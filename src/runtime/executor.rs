//! Conversation runtime executor

use super::traits::{AssistantClient, VendorClient};
use super::{Command, ConversationView, ViewEvent};

use crate::backend::Vendor;
use crate::state_machine::{
    transition, ConvContext, ConvState, Effect, Event, TicketCounter, TransitionError,
};
use crate::transcript::Transcript;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Generic conversation runtime that can work with any assistant and vendor clients
pub struct ConversationRuntime<A, V>
where
    A: AssistantClient + 'static,
    V: VendorClient + 'static,
{
    context: ConvContext,
    state: ConvState,
    transcript: Transcript,
    composer: String,
    selected_vendor: Option<Vendor>,
    assistant: Arc<A>,
    vendors: Arc<V>,
    reply_tickets: TicketCounter,
    fetch_tickets: TicketCounter,
    command_rx: mpsc::Receiver<Command>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ViewEvent>,
}

impl<A, V> ConversationRuntime<A, V>
where
    A: AssistantClient + 'static,
    V: VendorClient + 'static,
{
    pub fn new(
        context: ConvContext,
        assistant: A,
        vendors: V,
        command_rx: mpsc::Receiver<Command>,
        broadcast_tx: broadcast::Sender<ViewEvent>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        Self {
            context,
            state: ConvState::Idle,
            transcript: Transcript::seeded(),
            composer: String::new(),
            selected_vendor: None,
            assistant: Arc::new(assistant),
            vendors: Arc::new(vendors),
            reply_tickets: TicketCounter::new(),
            fetch_tickets: TicketCounter::new(),
            command_rx,
            event_rx,
            event_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting conversation runtime");

        // One input at a time, each applied to completion
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = self.event_rx.recv() => self.process_event(event),
            }
        }

        tracing::info!(session_id = %self.context.session_id, "Conversation runtime stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Edit(edit) => {
                edit.apply(&mut self.composer);
                self.broadcast_snapshot();
            }
            Command::Submit => {
                if self.composer.trim().is_empty() {
                    tracing::debug!("Ignoring empty submission");
                    return;
                }
                let ticket = self.reply_tickets.issue();
                let text = self.composer.clone();
                self.process_event(Event::UserMessage { text, ticket });
            }
            Command::ConfirmItinerary => {
                if !self.state.decision_pending() {
                    self.reject("No itinerary is waiting for a decision");
                    return;
                }
                let ticket = self.fetch_tickets.issue();
                self.process_event(Event::ItineraryConfirmed { ticket });
            }
            Command::DeclineItinerary => self.process_event(Event::ItineraryDeclined),
            Command::SelectVendor { index } => {
                self.process_event(Event::VendorSelected { index });
            }
        }
    }

    fn process_event(&mut self, event: Event) {
        let event_name = event.name();

        // Pure state transition
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(TransitionError::Stale(ticket)) => {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    ticket = %ticket,
                    event = event_name,
                    "Discarding superseded result"
                );
                return;
            }
            Err(TransitionError::EmptyMessage) => {
                tracing::debug!("Ignoring empty submission");
                return;
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %self.context.session_id,
                    state = self.state.name(),
                    event = event_name,
                    error = %e,
                    "Rejected event"
                );
                self.reject(e.to_string());
                return;
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        tracing::debug!(
            session_id = %self.context.session_id,
            from = old_state.name(),
            to = self.state.name(),
            event = event_name,
            "State transition"
        );

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.broadcast_snapshot();
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { message } => {
                self.transcript.push(message);
            }

            Effect::ClearComposer => {
                self.composer.clear();
            }

            Effect::RequestReply { ticket } => {
                // History includes the message appended just before this effect
                let history = self.transcript.to_wire();
                let assistant = self.assistant.clone();
                let event_tx = self.event_tx.clone();
                let session_id = self.context.session_id.clone();

                tokio::spawn(async move {
                    tracing::info!(
                        session_id = %session_id,
                        ticket = %ticket,
                        history_len = history.len(),
                        "Requesting assistant reply"
                    );
                    let event = match assistant.reply(&history).await {
                        Ok(reply) => Event::AssistantReplied { ticket, reply },
                        Err(e) => {
                            tracing::debug!(
                                session_id = %session_id,
                                ticket = %ticket,
                                "Assistant request failed, showing fallback"
                            );
                            Event::AssistantFailed {
                                ticket,
                                message: e.to_string(),
                            }
                        }
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::FetchVendors {
                ticket,
                vendor_type,
            } => {
                let vendors = self.vendors.clone();
                let event_tx = self.event_tx.clone();
                let session_id = self.context.session_id.clone();

                tokio::spawn(async move {
                    tracing::info!(
                        session_id = %session_id,
                        ticket = %ticket,
                        vendor_type = %vendor_type,
                        "Fetching vendors"
                    );
                    let event = match vendors.vendors_of_type(&vendor_type).await {
                        Ok(vendors) => Event::VendorsFetched { ticket, vendors },
                        Err(e) => {
                            tracing::debug!(
                                session_id = %session_id,
                                ticket = %ticket,
                                "Vendor fetch failed, showing fallback"
                            );
                            Event::VendorFetchFailed {
                                ticket,
                                message: e.to_string(),
                            }
                        }
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::RecordSelection { vendor } => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    vendor = %vendor.business_name,
                    city = %vendor.city,
                    "Vendor selected"
                );
                self.selected_vendor = Some(vendor);
            }
        }
    }

    fn snapshot(&self) -> ConversationView {
        ConversationView {
            transcript: self.transcript.clone(),
            composer: self.composer.clone(),
            state: self.state.clone(),
            selected_vendor: self.selected_vendor.clone(),
        }
    }

    fn broadcast_snapshot(&self) {
        let _ = self
            .broadcast_tx
            .send(ViewEvent::Snapshot(self.snapshot()));
    }

    fn reject(&self, reason: impl Into<String>) {
        let _ = self.broadcast_tx.send(ViewEvent::Rejected {
            reason: reason.into(),
        });
    }
}
