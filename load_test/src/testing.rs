//! In-memory transport for exercising user behavior without a server.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::Route;
use crate::error::{TransportError, TransportResult};
use crate::transport::{ApiResponse, ApiTransport};

type Responder = Arc<
    dyn Fn(&Route, Option<&serde_json::Value>) -> TransportResult<ApiResponse> + Send + Sync,
>;

/// A request captured by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub route: Route,
    pub body: Option<serde_json::Value>,
}

/// Transport that records every request and answers from a responder function
#[derive(Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

impl RecordingTransport {
    /// Answer every request with `200 {}`
    pub fn new() -> Self {
        Self::with_responder(|_, _| Ok(ApiResponse::new(200, "{}")))
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&Route, Option<&serde_json::Value>) -> TransportResult<ApiResponse>
            + Send
            + Sync
            + 'static,
    {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
        }
    }

    /// Login answers `200 {"id": login_id}`, register answers
    /// `200 {"id": register_id}`, everything else `200 {}`
    pub fn with_ids(login_id: u64, register_id: u64) -> Self {
        Self::with_responder(move |route, _| {
            let body = match route {
                Route::Login => serde_json::json!({ "id": login_id }),
                Route::Register => serde_json::json!({ "id": register_id }),
                _ => serde_json::json!({}),
            };
            Ok(ApiResponse::json(200, &body))
        })
    }

    /// Every request fails at the connection level
    pub fn unreachable() -> Self {
        Self::with_responder(|route, _| {
            Err(TransportError::Unavailable(format!("{} not reachable", route)))
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of recorded requests whose route matches `predicate`
    pub fn count_matching(&self, predicate: impl Fn(&Route) -> bool) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| predicate(&request.route))
            .count()
    }

    pub fn clear(&self) {
        self.requests.lock().clear();
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiTransport for RecordingTransport {
    async fn send(
        &self,
        route: Route,
        body: Option<serde_json::Value>,
    ) -> TransportResult<ApiResponse> {
        let response = (self.responder)(&route, body.as_ref());
        self.requests.lock().push(RecordedRequest { route, body });
        response
    }
}
