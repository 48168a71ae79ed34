use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use uuid::Uuid;

use chat_load_test::cli::{Cli, Mode, RunArgs};
use chat_load_test::engine;
use chat_load_test::metrics::{reporter, MetricsCollector};
use chat_load_test::transport::{HttpTransport, SharedTransport};
use chat_load_test::user::UserTask;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.mode {
        Mode::Tasks => {
            for task in UserTask::ALL {
                let note = if task.requires_session() {
                    "requires session"
                } else {
                    ""
                };
                println!("{:<22} {}", task.name(), note);
            }
        }

        Mode::Run(args) => {
            // Initialize tracing
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(if args.verbose {
                    tracing::Level::DEBUG
                } else {
                    tracing::Level::INFO
                })
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;

            run_load_test(args).await?;
        }
    }

    Ok(())
}

async fn run_load_test(args: RunArgs) -> Result<()> {
    let plan = args.to_plan()?;
    let run_id = Uuid::new_v4().to_string();

    tracing::info!("Chat API Load Test Starting...");
    tracing::info!("Run ID: {}", run_id);
    tracing::info!("Host: {}", args.host);
    tracing::info!("Profile: {}", args.profile);
    tracing::info!("  Users: {}", plan.users);
    tracing::info!("  Spawn Rate: {}/sec", plan.spawn_rate);
    match plan.duration {
        Some(duration) => tracing::info!("  Duration: {}s", duration.as_secs()),
        None => tracing::info!("  Duration: until Ctrl+C"),
    }
    tracing::info!(
        "  Wait: {:.1}s - {:.1}s",
        plan.wait.min().as_secs_f64(),
        plan.wait.max().as_secs_f64()
    );
    tracing::info!("  Tasks: {}", plan.tasks.tasks().len());

    let collector = MetricsCollector::new();
    let transport: SharedTransport = Arc::new(HttpTransport::new(
        &args.host,
        Duration::from_secs(args.request_timeout),
        collector.clone(),
    )?);

    // Start periodic metrics reporter
    let reporter_handle = if args.report_interval > 0 {
        let collector_clone = collector.clone();
        let interval = args.report_interval;
        Some(tokio::spawn(async move {
            reporter::start_periodic_reporter(collector_clone, interval).await;
        }))
    } else {
        None
    };

    // Ctrl+C stops the run early
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    engine::run(plan, transport, collector.clone(), shutdown_rx).await?;

    if let Some(handle) = reporter_handle {
        handle.abort();
    }

    collector.update_system_metrics();
    reporter::print_final_report(&collector);

    if let Some(path) = &args.json_report {
        let summary = reporter::build_summary(&collector, &run_id, &args.host);
        reporter::write_json_report(&summary, path)?;
        tracing::info!("JSON report written to {}", path.display());
    }

    tracing::info!("Load test complete");
    Ok(())
}
