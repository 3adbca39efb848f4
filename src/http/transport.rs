//! Transport seam between the extraction engine and the network

use crate::error::Result;
use crate::query::RequestDescriptor;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends a request descriptor and returns the decoded JSON body.
///
/// Implementations own retries and timeouts. A returned error is final for
/// that request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request
    async fn send(&self, request: &RequestDescriptor) -> Result<JsonValue>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &RequestDescriptor) -> Result<JsonValue> {
        (**self).send(request).await
    }
}
