//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use super::{Command, ComposerEdit, ConversationHandle, ConversationView, ViewEvent};
use crate::backend::{ApiError, AssistantReply, Vendor, WireMessage};
use crate::state_machine::ConvContext;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// A queued result plus how long to wait before returning it
struct Scripted<T> {
    result: Result<T, ApiError>,
    delay: Option<Duration>,
}

// ============================================================================
// Mock Assistant
// ============================================================================

/// Mock assistant that returns queued replies
#[derive(Default)]
pub struct MockAssistant {
    replies: Mutex<VecDeque<Scripted<AssistantReply>>>,
    /// Record of every history sent
    pub requests: Mutex<Vec<Vec<WireMessage>>>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: AssistantReply) {
        self.push(Ok(reply), None);
    }

    /// Queue a reply that arrives after `delay`
    pub fn queue_delayed_reply(&self, reply: AssistantReply, delay: Duration) {
        self.push(Ok(reply), Some(delay));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: ApiError) {
        self.push(Err(error), None);
    }

    fn push(&self, result: Result<AssistantReply, ApiError>, delay: Option<Duration>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted { result, delay });
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<Vec<WireMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantClient for MockAssistant {
    async fn reply(&self, history: &[WireMessage]) -> Result<AssistantReply, ApiError> {
        self.requests.lock().unwrap().push(history.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Scripted { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(ApiError::network("No mock reply queued")),
        }
    }
}

// ============================================================================
// Mock Vendor Directory
// ============================================================================

/// Mock vendor directory that returns queued listings
#[derive(Default)]
pub struct MockVendors {
    listings: Mutex<VecDeque<Scripted<Vec<Vendor>>>>,
    /// Record of every category requested
    pub requests: Mutex<Vec<String>>,
}

impl MockVendors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_vendors(&self, vendors: Vec<Vendor>) {
        self.push(Ok(vendors), None);
    }

    pub fn queue_delayed_vendors(&self, vendors: Vec<Vendor>, delay: Duration) {
        self.push(Ok(vendors), Some(delay));
    }

    pub fn queue_error(&self, error: ApiError) {
        self.push(Err(error), None);
    }

    fn push(&self, result: Result<Vec<Vendor>, ApiError>, delay: Option<Duration>) {
        self.listings
            .lock()
            .unwrap()
            .push_back(Scripted { result, delay });
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VendorClient for MockVendors {
    async fn vendors_of_type(&self, vendor_type: &str) -> Result<Vec<Vendor>, ApiError> {
        self.requests.lock().unwrap().push(vendor_type.to_string());
        let next = self.listings.lock().unwrap().pop_front();
        match next {
            Some(Scripted { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(ApiError::network("No mock vendors queued")),
        }
    }
}

/// Vendor fixture
pub fn vendor(name: &str, city: &str) -> Vendor {
    Vendor {
        id: Some(format!("{}-id", name.to_lowercase().replace(' ', "-"))),
        business_name: name.to_string(),
        vendor_type: "Driver".to_string(),
        city: city.to_string(),
        summary: format!("{name} serves {city}"),
    }
}

// ============================================================================
// Test Runtime
// ============================================================================

/// Helper for building test runtimes with minimal boilerplate
pub struct TestRuntime {
    pub handle: ConversationHandle,
    pub broadcast_rx: broadcast::Receiver<ViewEvent>,
    pub assistant: Arc<MockAssistant>,
    pub vendors: Arc<MockVendors>,
    /// Latest snapshot seen
    pub view: ConversationView,
    /// Rejection reasons seen so far
    pub rejections: Vec<String>,
}

impl TestRuntime {
    pub fn builder() -> TestRuntimeBuilder {
        TestRuntimeBuilder::new()
    }

    async fn send(&self, command: Command) {
        self.handle
            .command_tx
            .send(command)
            .await
            .expect("Failed to send command");
    }

    pub async fn type_text(&self, text: &str) {
        self.send(Command::Edit(ComposerEdit::Replace(text.to_string())))
            .await;
    }

    pub async fn submit(&self) {
        self.send(Command::Submit).await;
    }

    /// Type a message and submit it
    pub async fn say(&self, text: &str) {
        self.type_text(text).await;
        self.submit().await;
    }

    pub async fn confirm(&self) {
        self.send(Command::ConfirmItinerary).await;
    }

    pub async fn decline(&self) {
        self.send(Command::DeclineItinerary).await;
    }

    pub async fn select(&self, index: usize) {
        self.send(Command::SelectVendor { index }).await;
    }

    /// Wait for a snapshot satisfying `predicate`
    pub async fn wait_for(
        &mut self,
        predicate: impl Fn(&ConversationView) -> bool,
        timeout: Duration,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if let Ok(Ok(event)) =
                tokio::time::timeout(Duration::from_millis(50), self.broadcast_rx.recv()).await
            {
                if self.observe(event) && predicate(&self.view) {
                    return true;
                }
            }
        }
        false
    }

    /// Drain events for `duration`, returning the latest snapshot
    pub async fn settle(&mut self, duration: Duration) -> &ConversationView {
        let deadline = tokio::time::Instant::now() + duration;
        while let Ok(Ok(event)) =
            tokio::time::timeout_at(deadline, self.broadcast_rx.recv()).await
        {
            self.observe(event);
        }
        &self.view
    }

    /// Record an event; returns true if it was a snapshot
    fn observe(&mut self, event: ViewEvent) -> bool {
        match event {
            ViewEvent::Snapshot(view) => {
                self.view = view;
                true
            }
            ViewEvent::Rejected { reason } => {
                self.rejections.push(reason);
                false
            }
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.view
            .transcript
            .messages()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }
}

pub struct TestRuntimeBuilder {
    vendor_type: String,
    assistant: MockAssistant,
    vendors: MockVendors,
}

impl TestRuntimeBuilder {
    pub fn new() -> Self {
        Self {
            vendor_type: "Driver".to_string(),
            assistant: MockAssistant::new(),
            vendors: MockVendors::new(),
        }
    }

    pub fn vendor_type(mut self, vendor_type: impl Into<String>) -> Self {
        self.vendor_type = vendor_type.into();
        self
    }

    pub fn assistant(mut self, assistant: MockAssistant) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn vendors(mut self, vendors: MockVendors) -> Self {
        self.vendors = vendors;
        self
    }

    pub fn build(self) -> TestRuntime {
        let assistant = Arc::new(self.assistant);
        let vendors = Arc::new(self.vendors);
        let context = ConvContext::new("test-session", self.vendor_type);

        let handle = ConversationHandle::spawn(context, assistant.clone(), vendors.clone());
        let broadcast_rx = handle.subscribe();

        TestRuntime {
            handle,
            broadcast_rx,
            assistant,
            vendors,
            view: ConversationView::default(),
            rejections: Vec::new(),
        }
    }
}

impl Default for TestRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::WireRole;
    use crate::state_machine::transition::{
        ASSISTANT_FALLBACK, DECLINE_ACK, VENDOR_FETCH_FALLBACK, VENDOR_INVITE,
    };
    use crate::state_machine::ConvState;
    use crate::transcript::{Role, GREETING};

    const WAIT: Duration = Duration::from_secs(2);

    fn idle(view: &ConversationView) -> bool {
        view.state == ConvState::Idle
    }

    #[tokio::test]
    async fn test_mock_assistant_runs_dry() {
        let mock = MockAssistant::new();
        mock.queue_reply(AssistantReply::text("Hello"));

        let reply = mock.reply(&[]).await.unwrap();
        assert_eq!(reply.text, "Hello");
        assert!(mock.reply(&[]).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_reply_appends_and_sends_full_history() {
        let assistant = MockAssistant::new();
        assistant.queue_reply(AssistantReply::text("Where would you like to go?"));
        let mut rt = TestRuntime::builder().assistant(assistant).build();

        rt.say("  I want a holiday  ").await;
        assert!(rt.wait_for(|v| v.transcript.len() == 3 && idle(v), WAIT).await);

        assert_eq!(
            rt.texts(),
            vec![GREETING, "I want a holiday", "Where would you like to go?"]
        );
        assert!(rt.view.composer.is_empty());

        let requests = rt.assistant.recorded_requests();
        assert_eq!(requests.len(), 1);
        let history = &requests[0];
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, WireRole::Ai);
        assert_eq!(history[0].content, GREETING);
        assert_eq!(history[1].role, WireRole::User);
        assert_eq!(history[1].content, "I want a holiday");
    }

    #[tokio::test]
    async fn test_whitespace_submit_does_nothing() {
        let mut rt = TestRuntime::builder().build();

        rt.type_text("   \n").await;
        rt.submit().await;
        let view = rt.settle(Duration::from_millis(200)).await.clone();

        assert_eq!(view.transcript.len(), 1);
        assert_eq!(view.composer, "   \n");
        assert_eq!(view.state, ConvState::Idle);
        assert!(rt.assistant.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reply_appends_fallback() {
        let assistant = MockAssistant::new();
        assistant.queue_error(ApiError::status(500, "HTTP 500: boom"));
        let mut rt = TestRuntime::builder().assistant(assistant).build();

        rt.say("Hi").await;
        assert!(rt.wait_for(|v| v.transcript.len() == 3, WAIT).await);

        let last = rt.view.transcript.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.text, ASSISTANT_FALLBACK);
        assert_eq!(rt.view.state, ConvState::Idle);
    }

    #[tokio::test]
    async fn test_goa_itinerary_to_selection() {
        let assistant = MockAssistant::new();
        assistant.queue_reply(AssistantReply::itinerary("**Day 1**: Baga beach"));
        let vendors = MockVendors::new();
        vendors.queue_vendors(vec![vendor("Goa Rides", "Panaji"), vendor("Coast Cabs", "Margao")]);
        let mut rt = TestRuntime::builder()
            .assistant(assistant)
            .vendors(vendors)
            .build();

        rt.say("Plan a 2-day trip to Goa").await;
        assert!(rt.wait_for(|v| v.state.decision_pending(), WAIT).await);

        rt.confirm().await;
        assert!(rt.wait_for(|v| v.state.vendor_grid().is_some(), WAIT).await);
        assert_eq!(rt.vendors.recorded_requests(), vec!["Driver".to_string()]);
        assert!(!rt.view.state.decision_pending());
        assert_eq!(rt.texts().last().map(String::as_str), Some(VENDOR_INVITE));

        rt.select(1).await;
        assert!(rt.wait_for(|v| v.selected_vendor.is_some(), WAIT).await);
        assert_eq!(
            rt.view.selected_vendor.as_ref().map(|v| v.business_name.as_str()),
            Some("Coast Cabs")
        );
        assert!(rt.view.state.vendor_grid().is_none());
        assert_eq!(
            rt.texts().last().map(String::as_str),
            Some("You selected: Coast Cabs from Margao")
        );
    }

    #[tokio::test]
    async fn test_decline_makes_no_vendor_request() {
        let assistant = MockAssistant::new();
        assistant.queue_reply(AssistantReply::itinerary("Day 1: hills"));
        let mut rt = TestRuntime::builder().assistant(assistant).build();

        rt.say("Plan Manali").await;
        assert!(rt.wait_for(|v| v.state.decision_pending(), WAIT).await);

        rt.decline().await;
        assert!(rt.wait_for(|v| !v.state.decision_pending(), WAIT).await);
        rt.settle(Duration::from_millis(100)).await;

        assert_eq!(rt.texts().last().map(String::as_str), Some(DECLINE_ACK));
        assert!(rt.vendors.recorded_requests().is_empty());
        assert_eq!(rt.view.state, ConvState::Idle);
    }

    #[tokio::test]
    async fn test_vendor_failure_and_empty_list() {
        let assistant = MockAssistant::new();
        assistant.queue_reply(AssistantReply::itinerary("Plan A"));
        assistant.queue_reply(AssistantReply::itinerary("Plan B"));
        let vendors = MockVendors::new();
        vendors.queue_error(ApiError::network("connection refused"));
        vendors.queue_vendors(vec![]);
        let mut rt = TestRuntime::builder()
            .assistant(assistant)
            .vendors(vendors)
            .build();

        rt.say("First").await;
        assert!(rt.wait_for(|v| v.state.decision_pending(), WAIT).await);
        rt.confirm().await;
        assert!(
            rt.wait_for(
                |v| v.transcript.last().is_some_and(|m| m.text == VENDOR_FETCH_FALLBACK),
                WAIT
            )
            .await
        );
        assert!(rt.view.state.vendor_grid().is_none());

        rt.say("Second").await;
        assert!(rt.wait_for(|v| v.state.decision_pending(), WAIT).await);
        rt.confirm().await;
        assert!(
            rt.wait_for(
                |v| v.transcript.last().is_some_and(|m| m.text == VENDOR_INVITE),
                WAIT
            )
            .await
        );
        assert_eq!(rt.view.state, ConvState::Idle);
    }

    #[tokio::test]
    async fn test_superseded_reply_is_discarded() {
        let assistant = MockAssistant::new();
        assistant.queue_delayed_reply(
            AssistantReply::text("Reply to first"),
            Duration::from_millis(300),
        );
        assistant.queue_reply(AssistantReply::text("Reply to second"));
        let mut rt = TestRuntime::builder().assistant(assistant).build();

        rt.say("first").await;
        rt.say("second").await;
        assert!(rt.wait_for(|v| idle(v) && v.transcript.len() == 4, WAIT).await);

        // Let the slow reply land
        rt.settle(Duration::from_millis(500)).await;
        assert_eq!(
            rt.texts(),
            vec![GREETING, "first", "second", "Reply to second"]
        );
        assert_eq!(rt.assistant.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_message_while_loading_vendors_supersedes_fetch() {
        let assistant = MockAssistant::new();
        assistant.queue_reply(AssistantReply::itinerary("Plan"));
        assistant.queue_delayed_reply(AssistantReply::text("Sure"), Duration::from_millis(50));
        let vendors = MockVendors::new();
        vendors.queue_delayed_vendors(
            vec![vendor("Goa Rides", "Panaji")],
            Duration::from_millis(200),
        );
        let mut rt = TestRuntime::builder()
            .assistant(assistant)
            .vendors(vendors)
            .build();

        rt.say("Plan Goa").await;
        assert!(rt.wait_for(|v| v.state.decision_pending(), WAIT).await);
        rt.confirm().await;
        rt.say("Actually, make it 3 days").await;
        assert!(rt.wait_for(|v| idle(v) && v.transcript.len() == 5, WAIT).await);

        rt.settle(Duration::from_millis(400)).await;
        assert!(rt.view.state.vendor_grid().is_none());
        assert_eq!(rt.texts().last().map(String::as_str), Some("Sure"));
    }

    #[tokio::test]
    async fn test_invalid_actions_are_rejected() {
        let mut rt = TestRuntime::builder().build();

        rt.confirm().await;
        rt.select(0).await;
        rt.settle(Duration::from_millis(200)).await;

        assert_eq!(rt.rejections.len(), 2);
        assert!(rt.vendors.recorded_requests().is_empty());
        assert_eq!(rt.view.transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_configured_vendor_type_is_requested() {
        let assistant = MockAssistant::new();
        assistant.queue_reply(AssistantReply::itinerary("Plan"));
        let vendors = MockVendors::new();
        vendors.queue_vendors(vec![vendor("Spice Route", "Kochi")]);
        let mut rt = TestRuntime::builder()
            .vendor_type("Restaurant")
            .assistant(assistant)
            .vendors(vendors)
            .build();

        rt.say("Kerala food tour").await;
        assert!(rt.wait_for(|v| v.state.decision_pending(), WAIT).await);
        rt.confirm().await;
        assert!(rt.wait_for(|v| v.state.vendor_grid().is_some(), WAIT).await);

        assert_eq!(rt.vendors.recorded_requests(), vec!["Restaurant".to_string()]);
    }

    #[tokio::test]
    async fn test_runtime_stops_when_handle_dropped() {
        let rt = TestRuntime::builder().build();
        let TestRuntime {
            handle,
            mut broadcast_rx,
            ..
        } = rt;
        drop(handle);

        let closed = tokio::time::timeout(WAIT, broadcast_rx.recv()).await;
        assert!(matches!(
            closed,
            Ok(Err(broadcast::error::RecvError::Closed))
        ));
    }
}
