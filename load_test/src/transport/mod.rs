//! Transport seam between simulated users and the chat API.
//!
//! User behavior only ever talks to an [`ApiTransport`]. The production
//! implementation is [`HttpTransport`], which also feeds request statistics
//! into the metrics collector.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::Route;
use crate::error::TransportResult;

pub use http::HttpTransport;

/// Status and raw body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Numeric `id` field of a successful JSON object response.
    ///
    /// Returns `None` for non-2xx statuses, bodies that are not JSON
    /// objects, and missing or non-numeric ids.
    pub fn id(&self) -> Option<u64> {
        if !self.is_success() {
            return None;
        }
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        value.as_object()?.get("id")?.as_u64()
    }
}

/// Issues requests against the chat API
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send one request. `body` is serialized as JSON for POST routes.
    async fn send(
        &self,
        route: Route,
        body: Option<serde_json::Value>,
    ) -> TransportResult<ApiResponse>;
}

/// Type alias for a shared transport
pub type SharedTransport = Arc<dyn ApiTransport>;

/// Encode a request payload as a JSON body
pub fn encode_body<T: Serialize>(payload: &T) -> TransportResult<serde_json::Value> {
    Ok(serde_json::to_value(payload)?)
}
