//! User runner - spawn simulated users at a fixed rate and run them until stopped

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::config::WaitTime;
use crate::error::ConfigError;
use crate::metrics::MetricsCollector;
use crate::transport::SharedTransport;
use crate::user::{ChatUser, TaskSet};

/// Shape of one load test run
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub users: usize,
    /// Users started per second
    pub spawn_rate: f64,
    /// `None` runs until the shutdown signal fires
    pub duration: Option<Duration>,
    pub wait: WaitTime,
    pub tasks: TaskSet,
}

impl RunPlan {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.users == 0 {
            return Err(ConfigError::NoUsers);
        }
        self.spawn_interval()?;
        Ok(())
    }

    /// Time between two user spawns. Rates whose interval rounds to zero or
    /// does not fit in a `Duration` are rejected.
    fn spawn_interval(&self) -> Result<Duration, ConfigError> {
        if !self.spawn_rate.is_finite() || self.spawn_rate <= 0.0 {
            return Err(ConfigError::InvalidSpawnRate(self.spawn_rate));
        }
        match Duration::try_from_secs_f64(1.0 / self.spawn_rate) {
            Ok(period) if !period.is_zero() => Ok(period),
            _ => Err(ConfigError::InvalidSpawnRate(self.spawn_rate)),
        }
    }
}

/// Run `plan` until its duration elapses or `shutdown` becomes `true`.
///
/// Returns once every user has stopped. Users are cancelled wherever they
/// are suspended, including in the middle of a request.
pub async fn run(
    plan: RunPlan,
    transport: SharedTransport,
    collector: MetricsCollector,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    plan.validate()?;
    let spawn_interval = plan.spawn_interval()?;

    let deadline = plan.duration.map(|duration| Instant::now() + duration);
    let tasks = Arc::new(plan.tasks.clone());
    let (stop_tx, stop_rx) = watch::channel(false);

    tracing::info!(
        "Spawning {} users at {}/sec",
        plan.users,
        plan.spawn_rate
    );

    let mut ticker = interval(spawn_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut user_handles = Vec::with_capacity(plan.users);
    let mut stopped_early = false;

    while user_handles.len() < plan.users {
        tokio::select! {
            _ = ticker.tick() => {
                let user_number = user_handles.len() + 1;
                let handle = tokio::spawn(run_user(
                    user_number,
                    transport.clone(),
                    tasks.clone(),
                    plan.wait,
                    collector.clone(),
                    stop_rx.clone(),
                ));
                user_handles.push(handle);
            }
            _ = until(deadline) => {
                tracing::info!("Run duration elapsed during ramp-up");
                stopped_early = true;
                break;
            }
            _ = signalled(&mut shutdown) => {
                tracing::info!("Shutdown requested during ramp-up");
                stopped_early = true;
                break;
            }
        }
    }

    if !stopped_early {
        tracing::info!("All {} users spawned", user_handles.len());
        tokio::select! {
            _ = until(deadline) => tracing::info!("Run duration elapsed"),
            _ = signalled(&mut shutdown) => tracing::info!("Shutdown requested"),
        }
    }

    let _ = stop_tx.send(true);

    tracing::info!("Stopping {} users...", user_handles.len());

    for (idx, handle) in user_handles.into_iter().enumerate() {
        if let Err(e) = handle.await {
            tracing::error!("User task {} panicked: {}", idx + 1, e);
        }
    }

    tracing::info!("All users stopped");
    Ok(())
}

/// Lifecycle of one simulated user: startup, then task + think time forever
async fn run_user(
    user_number: usize,
    transport: SharedTransport,
    tasks: Arc<TaskSet>,
    wait: WaitTime,
    collector: MetricsCollector,
    mut stop: watch::Receiver<bool>,
) {
    collector.user_spawned();
    tracing::debug!("User {} spawned", user_number);

    let behavior = async {
        let mut user = ChatUser::start(transport).await;
        let mut rng = StdRng::from_entropy();
        loop {
            let task = user.step(&tasks).await;
            tracing::trace!("User {} finished {}", user_number, task);
            tokio::time::sleep(wait.sample(&mut rng)).await;
        }
    };

    tokio::select! {
        _ = behavior => {}
        _ = signalled(&mut stop) => {}
    }

    collector.user_stopped();
    tracing::debug!("User {} stopped", user_number);
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Resolves once the watched flag is `true`. A dropped sender never resolves.
async fn signalled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
