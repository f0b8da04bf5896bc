//! Trip planner backend
//!
//! HTTP clients for the assistant service (`POST /chat`) and the vendor
//! directory (`/vendors`), plus the wire types they exchange.

mod error;
mod http;
mod types;

pub use error::{ApiError, ApiErrorKind};
pub use http::HttpBackend;
pub use types::*;

use crate::runtime::{AssistantClient, VendorClient};
use async_trait::async_trait;
use std::time::Instant;

/// Logging wrapper for backend clients
pub struct LoggingClient<C> {
    inner: C,
}

impl<C> LoggingClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: AssistantClient> AssistantClient for LoggingClient<C> {
    async fn reply(&self, history: &[WireMessage]) -> Result<AssistantReply, ApiError> {
        let start = Instant::now();
        let result = self.inner.reply(history).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    next_action = ?reply.next_action,
                    finished = reply.finished,
                    "Assistant request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e.message,
                    "Assistant request failed"
                );
            }
        }

        result
    }
}

#[async_trait]
impl<C: VendorClient> VendorClient for LoggingClient<C> {
    async fn vendors_of_type(&self, vendor_type: &str) -> Result<Vec<Vendor>, ApiError> {
        let start = Instant::now();
        let result = self.inner.vendors_of_type(vendor_type).await;
        let duration = start.elapsed();

        match &result {
            Ok(vendors) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    vendor_type,
                    count = vendors.len(),
                    "Vendor directory request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    vendor_type,
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e.message,
                    "Vendor directory request failed"
                );
            }
        }

        result
    }
}
