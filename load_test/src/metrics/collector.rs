//! Metrics collector - thread-safe collection with per-endpoint latency tracking

use super::types::{EndpointStats, LatencyStats, TestMetrics};
use crate::api::Method;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

struct EndpointRecord {
    requests: usize,
    failures: usize,
    latencies: Histogram<u64>,
}

impl EndpointRecord {
    fn new() -> Self {
        Self {
            requests: 0,
            failures: 0,
            latencies: Histogram::new(3).expect("Failed to create endpoint histogram"),
        }
    }
}

type EndpointKey = (&'static str, Method);

#[derive(Clone)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<TestMetrics>>,
    endpoints: Arc<RwLock<BTreeMap<EndpointKey, EndpointRecord>>>,
    request_latencies: Arc<RwLock<Histogram<u64>>>,
    system: Arc<RwLock<System>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        // Create histogram with 3 significant digits of precision
        let request_hist = Histogram::new(3).expect("Failed to create request histogram");

        // Initialize system monitor
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            metrics: Arc::new(RwLock::new(TestMetrics::default())),
            endpoints: Arc::new(RwLock::new(BTreeMap::new())),
            request_latencies: Arc::new(RwLock::new(request_hist)),
            system: Arc::new(RwLock::new(system)),
            start_time: Instant::now(),
        }
    }

    pub fn user_spawned(&self) {
        let mut metrics = self.metrics.write();
        metrics.users.spawned += 1;
        metrics.users.active += 1;
    }

    pub fn user_stopped(&self) {
        let mut metrics = self.metrics.write();
        metrics.users.stopped += 1;
        metrics.users.active = metrics.users.active.saturating_sub(1);
    }

    pub fn request_succeeded(&self, method: Method, name: &'static str, duration_ms: u64) {
        self.record_request(method, name, duration_ms, false);
    }

    pub fn request_failed(&self, method: Method, name: &'static str, duration_ms: u64) {
        self.record_request(method, name, duration_ms, true);
    }

    fn record_request(&self, method: Method, name: &'static str, duration_ms: u64, failed: bool) {
        let mut metrics = self.metrics.write();
        metrics.requests.total += 1;
        if failed {
            metrics.requests.failed += 1;
        } else {
            metrics.requests.succeeded += 1;
        }
        drop(metrics);

        let mut endpoints = self.endpoints.write();
        let record = endpoints
            .entry((name, method))
            .or_insert_with(EndpointRecord::new);
        record.requests += 1;
        if failed {
            record.failures += 1;
        }
        let _ = record.latencies.record(duration_ms);
        drop(endpoints);

        // Failed requests still count towards latency
        let _ = self.request_latencies.write().record(duration_ms);
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut system = self.system.write();
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.metrics.write();

        metrics.system.cpu_usage = system.global_cpu_usage();
        metrics.system.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.system.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn get_snapshot(&self) -> TestMetrics {
        self.metrics.read().clone()
    }

    /// Per-endpoint statistics, sorted by name then method
    pub fn endpoint_stats(&self) -> Vec<EndpointStats> {
        self.endpoints
            .read()
            .iter()
            .map(|((name, method), record)| EndpointStats {
                method: method.to_string(),
                name: (*name).to_string(),
                requests: record.requests,
                failures: record.failures,
                latency: latency_stats(&record.latencies),
            })
            .collect()
    }

    pub fn get_request_latency_percentiles(&self) -> LatencyStats {
        latency_stats(&self.request_latencies.read())
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn latency_stats(hist: &Histogram<u64>) -> LatencyStats {
    if hist.is_empty() {
        return LatencyStats::default();
    }
    LatencyStats {
        min: hist.min(),
        p50: hist.value_at_quantile(0.50),
        p95: hist.value_at_quantile(0.95),
        p99: hist.value_at_quantile(0.99),
        max: hist.max(),
        mean: hist.mean(),
        count: hist.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_counters() {
        let collector = MetricsCollector::new();
        collector.user_spawned();
        collector.user_spawned();
        collector.user_stopped();

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.users.spawned, 2);
        assert_eq!(snapshot.users.active, 1);
        assert_eq!(snapshot.users.stopped, 1);
    }

    #[test]
    fn test_requests_aggregate_per_endpoint() {
        let collector = MetricsCollector::new();
        collector.request_succeeded(Method::Get, "/users", 10);
        collector.request_succeeded(Method::Get, "/users", 30);
        collector.request_failed(Method::Post, "/api/auth/login", 5);

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.requests.total, 3);
        assert_eq!(snapshot.requests.succeeded, 2);
        assert_eq!(snapshot.requests.failed, 1);

        let stats = collector.endpoint_stats();
        assert_eq!(stats.len(), 2);

        let login = &stats[0];
        assert_eq!(login.name, "/api/auth/login");
        assert_eq!(login.method, "POST");
        assert_eq!(login.failures, 1);
        assert_eq!(login.failure_ratio(), 1.0);

        let users = &stats[1];
        assert_eq!(users.name, "/users");
        assert_eq!(users.requests, 2);
        assert_eq!(users.failures, 0);
        assert_eq!(users.latency.count, 2);
        assert_eq!(users.latency.min, 10);
        assert_eq!(users.latency.mean, 20.0);
    }

    #[test]
    fn test_concurrent_requests_all_reach_overall_latency() {
        let collector = MetricsCollector::new();

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let collector = collector.clone();
                std::thread::spawn(move || {
                    for i in 0..5_000u64 {
                        if i % 10 == 0 {
                            collector.request_failed(Method::Post, "/api/auth/login", worker + i);
                        } else {
                            collector.request_succeeded(Method::Get, "/users", worker + i);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.requests.total, 40_000);
        assert_eq!(snapshot.requests.failed, 4_000);

        let overall = collector.get_request_latency_percentiles();
        assert_eq!(overall.count, snapshot.requests.total as u64);

        let per_endpoint: u64 = collector
            .endpoint_stats()
            .iter()
            .map(|stats| stats.latency.count)
            .sum();
        assert_eq!(per_endpoint, overall.count);
    }

    #[test]
    fn test_empty_latency_is_zeroed() {
        let collector = MetricsCollector::new();
        assert_eq!(
            collector.get_request_latency_percentiles(),
            LatencyStats::default()
        );
    }
}
