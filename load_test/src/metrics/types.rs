//! Metric types

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserMetrics {
    pub spawned: usize,
    pub active: usize,
    pub stopped: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestMetrics {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestMetrics {
    pub users: UserMetrics,
    pub requests: RequestMetrics,
    pub system: SystemMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub min: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
    pub count: u64,
}

/// Aggregated statistics for one endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStats {
    pub method: String,
    pub name: String,
    pub requests: usize,
    pub failures: usize,
    pub latency: LatencyStats,
}

impl EndpointStats {
    pub fn failure_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.failures as f64 / self.requests as f64
        }
    }
}

/// Final run summary, written as JSON with `--json-report`
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub host: String,
    pub duration_secs: u64,
    pub metrics: TestMetrics,
    pub overall_latency: LatencyStats,
    pub endpoints: Vec<EndpointStats>,
}
