//! reqwest-backed transport that records request statistics

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{ApiResponse, ApiTransport};
use crate::api::{Method, Route};
use crate::error::{ConfigError, TransportError, TransportResult};
use crate::metrics::MetricsCollector;

/// HTTP transport against a fixed target host
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    collector: MetricsCollector,
}

impl HttpTransport {
    /// Create a transport for `host` (e.g. `http://localhost:8000`)
    pub fn new(
        host: &str,
        request_timeout: Duration,
        collector: MetricsCollector,
    ) -> anyhow::Result<Self> {
        let base_url = host.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidHost(host.to_string()).into());
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            collector,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn record(&self, route: Route, started: Instant, succeeded: bool) {
        let duration_ms = started.elapsed().as_millis() as u64;
        if succeeded {
            self.collector
                .request_succeeded(route.method(), route.stats_name(), duration_ms);
        } else {
            self.collector
                .request_failed(route.method(), route.stats_name(), duration_ms);
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(
        &self,
        route: Route,
        body: Option<serde_json::Value>,
    ) -> TransportResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, route.path());
        let request = match route.method() {
            Method::Get => self.client.get(&url),
            Method::Post => {
                let request = self.client.post(&url);
                match body {
                    Some(body) => request.json(&body),
                    None => request,
                }
            }
        };

        let started = Instant::now();
        let result = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(ApiResponse::new(status, body.to_vec()))
        }
        .await;

        match result {
            Ok(response) => {
                // 4xx and 5xx are recorded as failures
                self.record(route, started, response.status < 400);
                if response.status >= 400 {
                    tracing::debug!("{} returned {}", route, response.status);
                }
                Ok(response)
            }
            Err(source) => {
                self.record(route, started, false);
                tracing::debug!("{} failed: {}", route, source);
                Err(TransportError::Http {
                    route: route.to_string(),
                    source,
                })
            }
        }
    }
}
