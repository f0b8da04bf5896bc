//! reqwest implementation of the trip planner backend

use super::types::{
    AssistantReply, ChatRequest, ChatResponse, HealthStatus, Vendor, VendorRegistration,
    WireMessage,
};
use super::ApiError;
use crate::config::BackendConfig;
use crate::runtime::{AssistantClient, VendorClient};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// HTTP client for the assistant and vendor directory endpoints
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /`
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        read_json(response).await
    }

    /// `POST /vendors`
    pub async fn register_vendor(
        &self,
        registration: &VendorRegistration,
    ) -> Result<Vendor, ApiError> {
        let response = self
            .client
            .post(self.url("/vendors"))
            .json(registration)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        read_json(response).await
    }
}

#[async_trait]
impl AssistantClient for HttpBackend {
    async fn reply(&self, history: &[WireMessage]) -> Result<AssistantReply, ApiError> {
        let request = ChatRequest {
            chat_history: history.to_vec(),
        };
        let response = self
            .client
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let chat: ChatResponse = read_json(response).await?;
        Ok(chat.into_reply())
    }
}

#[async_trait]
impl VendorClient for HttpBackend {
    async fn vendors_of_type(&self, vendor_type: &str) -> Result<Vec<Vendor>, ApiError> {
        let response = self
            .client
            .get(self.url("/vendors"))
            .query(&[("vendor_type", vendor_type)])
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;
        read_json(response).await
    }
}

/// Check the status, then decode the body as `T`
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

    if !status.is_success() {
        return Err(ApiError::status(
            status.as_u16(),
            format!("HTTP {status}: {}", truncate(&body, 200)),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        ApiError::decode(format!(
            "Failed to parse response: {e} - body: {}",
            truncate(&body, 200)
        ))
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
