//! Trait abstractions for runtime I/O
//!
//! These traits let the runtime run against the HTTP backend in production
//! and against queued mocks in tests.

use crate::backend::{ApiError, AssistantReply, Vendor, WireMessage};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for the assistant service
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send the full history and wait for the next reply
    async fn reply(&self, history: &[WireMessage]) -> Result<AssistantReply, ApiError>;
}

/// Client for the vendor directory service
#[async_trait]
pub trait VendorClient: Send + Sync {
    /// List vendors of one category
    async fn vendors_of_type(&self, vendor_type: &str) -> Result<Vec<Vendor>, ApiError>;
}

// ============================================================================
// Arc implementations for shared clients
// ============================================================================

#[async_trait]
impl<T: AssistantClient + ?Sized> AssistantClient for Arc<T> {
    async fn reply(&self, history: &[WireMessage]) -> Result<AssistantReply, ApiError> {
        (**self).reply(history).await
    }
}

#[async_trait]
impl<T: VendorClient + ?Sized> VendorClient for Arc<T> {
    async fn vendors_of_type(&self, vendor_type: &str) -> Result<Vec<Vendor>, ApiError> {
        (**self).vendors_of_type(vendor_type).await
    }
}
