//! Console reporter for metrics with real-time updates

use super::collector::MetricsCollector;
use super::types::{EndpointStats, RunSummary};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tokio::time::{interval, Duration};

/// Start periodic metrics reporting (every N seconds)
pub async fn start_periodic_reporter(collector: MetricsCollector, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        // Update system metrics before printing
        collector.update_system_metrics();

        print_live_metrics(&collector);
    }
}

/// Print live metrics (clears screen and updates in place)
pub fn print_live_metrics(collector: &MetricsCollector) {
    // Clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");

    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_request_latency_percentiles();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║              Chat API Load Test - Live Metrics                 ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!(
        "\n⏱️  Elapsed Time: {:02}:{:02}:{:02}",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60
    );

    println!("\n┌─ USERS ─────────────────────────────────────────────────────┐");
    println!(
        "│  Spawned:      {:>8}    Active:     {:>8}              │",
        metrics.users.spawned, metrics.users.active
    );
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n┌─ REQUESTS ──────────────────────────────────────────────────┐");
    println!(
        "│  Total:        {:>8}    Failed:     {:>8}              │",
        metrics.requests.total, metrics.requests.failed
    );
    if metrics.requests.total > 0 {
        let success_rate =
            (metrics.requests.succeeded as f64 / metrics.requests.total as f64) * 100.0;
        let throughput = if elapsed > 0 {
            metrics.requests.total as f64 / elapsed as f64
        } else {
            0.0
        };
        println!(
            "│  Success Rate: {:>7.2}%    Throughput: {:>7.2}/sec        │",
            success_rate, throughput
        );
    }
    println!("└─────────────────────────────────────────────────────────────┘");

    if latency.count > 0 {
        println!("\n┌─ REQUEST LATENCY (ms) ──────────────────────────────────────┐");
        println!(
            "│  Min: {:>6}  P50: {:>6}  P95: {:>6}  P99: {:>6}  Max: {:>6}│",
            latency.min, latency.p50, latency.p95, latency.p99, latency.max
        );
        println!(
            "│  Mean: {:>8.2} ms    Count: {:>10}                    │",
            latency.mean, latency.count
        );
        println!("└─────────────────────────────────────────────────────────────┘");
    }

    let endpoints = collector.endpoint_stats();
    if !endpoints.is_empty() {
        println!();
        print_endpoint_table(&endpoints);
    }

    println!("\n┌─ SYSTEM ────────────────────────────────────────────────────┐");
    println!(
        "│  CPU Usage:    {:>6.1}%    Memory: {:>6} / {:>6} MB       │",
        metrics.system.cpu_usage, metrics.system.memory_used_mb, metrics.system.memory_total_mb
    );
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n  [Press Ctrl+C to stop test]");

    // Flush stdout to ensure immediate display
    let _ = io::stdout().flush();
}

fn print_endpoint_table(endpoints: &[EndpointStats]) {
    println!(
        "   {:<6} {:<28} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Method", "Name", "Reqs", "Fails", "P50", "P95", "Max"
    );
    for stats in endpoints {
        println!(
            "   {:<6} {:<28} {:>8} {:>8} {:>8} {:>8} {:>8}",
            stats.method,
            stats.name,
            stats.requests,
            stats.failures,
            stats.latency.p50,
            stats.latency.p95,
            stats.latency.max
        );
    }
}

/// Print final summary report
pub fn print_final_report(collector: &MetricsCollector) {
    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_request_latency_percentiles();

    println!("\n╔════════════════════════════════════════════════════════════════╗");
    println!("║                    FINAL TEST REPORT                           ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!("\n👥 USERS");
    println!("   Total Spawned:        {:>10}", metrics.users.spawned);
    println!("   Stopped:              {:>10}", metrics.users.stopped);

    println!("\n📊 REQUESTS");
    println!("   Total:                {:>10}", metrics.requests.total);
    println!("   Succeeded:            {:>10}", metrics.requests.succeeded);
    println!("   Failed:               {:>10}", metrics.requests.failed);

    if elapsed > 0 {
        let throughput = metrics.requests.total as f64 / elapsed as f64;
        println!("   Throughput:           {:>10.2} requests/sec", throughput);
    }

    if metrics.requests.total > 0 {
        let success_rate =
            (metrics.requests.succeeded as f64 / metrics.requests.total as f64) * 100.0;
        println!("   Success Rate:         {:>10.2}%", success_rate);
    }

    if latency.count > 0 {
        println!("\n📈 REQUEST LATENCY");
        println!("   Min:                  {:>10} ms", latency.min);
        println!("   P50 (Median):         {:>10} ms", latency.p50);
        println!("   P95:                  {:>10} ms", latency.p95);
        println!("   P99:                  {:>10} ms", latency.p99);
        println!("   Max:                  {:>10} ms", latency.max);
        println!("   Mean:                 {:>10.2} ms", latency.mean);
    }

    let endpoints = collector.endpoint_stats();
    if !endpoints.is_empty() {
        println!("\n🔗 ENDPOINTS");
        print_endpoint_table(&endpoints);
    }

    println!("\n⏱️  Test Duration: {} seconds", elapsed);
    println!("════════════════════════════════════════════════════════════════\n");
}

/// Build the serializable summary of a finished run
pub fn build_summary(collector: &MetricsCollector, run_id: &str, host: &str) -> RunSummary {
    RunSummary {
        run_id: run_id.to_string(),
        host: host.to_string(),
        duration_secs: collector.elapsed_seconds(),
        metrics: collector.get_snapshot(),
        overall_latency: collector.get_request_latency_percentiles(),
        endpoints: collector.endpoint_stats(),
    }
}

/// Write the run summary as pretty-printed JSON
pub fn write_json_report(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
    Ok(())
}
