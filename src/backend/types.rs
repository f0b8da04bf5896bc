//! Wire types for the trip planner backend

use serde::{Deserialize, Serialize};

/// Role vocabulary expected by the assistant service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireRole {
    Ai,
    User,
}

/// One entry of `chat_history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub chat_history: Vec<WireMessage>,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub ai_message: String,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub is_finished: bool,
}

impl ChatResponse {
    pub fn into_reply(self) -> AssistantReply {
        AssistantReply {
            text: self.ai_message,
            next_action: NextAction::from_wire(self.next_action.as_deref()),
            finished: self.is_finished,
        }
    }
}

/// Advisory signal attached to an assistant reply
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NextAction {
    ItineraryGenerated,
    /// Any other hint the service sends; carries no UI follow-up
    Other(String),
    #[default]
    None,
}

impl NextAction {
    pub const ITINERARY_GENERATED: &'static str = "itinerary_generated";

    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some(Self::ITINERARY_GENERATED) => NextAction::ItineraryGenerated,
            Some("") | None => NextAction::None,
            Some(other) => NextAction::Other(other.to_string()),
        }
    }

    pub fn is_itinerary(&self) -> bool {
        matches!(self, NextAction::ItineraryGenerated)
    }
}

/// Assistant reply as seen by the conversation controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub next_action: NextAction,
    pub finished: bool,
}

impl AssistantReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_action: NextAction::None,
            finished: false,
        }
    }

    pub fn itinerary(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_action: NextAction::ItineraryGenerated,
            finished: false,
        }
    }
}

/// A vendor record from the directory service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VendorRecord")]
pub struct Vendor {
    pub id: Option<String>,
    pub business_name: String,
    pub vendor_type: String,
    pub city: String,
    pub summary: String,
}

/// Raw record; identity may arrive as `id` or as the document store's `_id`
#[derive(Deserialize)]
struct VendorRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    document_id: Option<String>,
    business_name: String,
    vendor_type: String,
    city: String,
    #[serde(default)]
    summary: String,
}

impl From<VendorRecord> for Vendor {
    fn from(record: VendorRecord) -> Self {
        Self {
            id: record.id.or(record.document_id),
            business_name: record.business_name,
            vendor_type: record.vendor_type,
            city: record.city,
            summary: record.summary,
        }
    }
}

/// Body of `POST /vendors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorRegistration {
    pub vendor_type: String,
    pub business_name: String,
    pub contact_name: String,
    pub mobile_number: String,
    pub city: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
}

/// Response of `GET /`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}
