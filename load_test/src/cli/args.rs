use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{get_load_profile, WaitTime};
use crate::engine::RunPlan;
use crate::error::ConfigError;
use crate::user::{TaskSet, UserTask};

/// Chat API Load Testing Tool
#[derive(Parser, Debug)]
#[command(name = "chat-load-test")]
#[command(about = "Simulate concurrent users of a chat application's HTTP API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Run a load test against the target host (runs until the duration elapses or Ctrl+C)
    Run(RunArgs),

    /// List the tasks simulated users pick from
    Tasks,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Base URL of the chat application
    #[arg(long, default_value = "http://localhost:8000", env = "CHAT_LOAD_HOST")]
    pub host: String,

    /// Load profile: smoke, default, stress
    #[arg(long, default_value = "default")]
    pub profile: String,

    /// Number of simulated users (overrides the profile)
    #[arg(short, long, env = "CHAT_LOAD_USERS")]
    pub users: Option<usize>,

    /// Users started per second (overrides the profile)
    #[arg(short = 'r', long, env = "CHAT_LOAD_SPAWN_RATE")]
    pub spawn_rate: Option<f64>,

    /// Test duration in seconds, 0 runs until Ctrl+C (overrides the profile)
    #[arg(short = 't', long, env = "CHAT_LOAD_DURATION")]
    pub duration: Option<u64>,

    /// Minimum wait between tasks in seconds
    #[arg(long, default_value = "1.0")]
    pub wait_min: f64,

    /// Maximum wait between tasks in seconds
    #[arg(long, default_value = "3.0")]
    pub wait_max: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout: u64,

    /// Live metrics interval in seconds, 0 disables the live view
    #[arg(long, default_value = "5")]
    pub report_interval: u64,

    /// Restrict users to these tasks (repeatable), see the `tasks` command
    #[arg(long = "task")]
    pub tasks: Vec<String>,

    /// Write the final report as JSON to this file
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunArgs {
    /// Resolve the profile and overrides into a run plan
    pub fn to_plan(&self) -> Result<RunPlan, ConfigError> {
        let profile = get_load_profile(&self.profile);

        let duration = match self.duration {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => profile.duration,
        };

        if !(self.wait_min >= 0.0 && self.wait_max.is_finite() && self.wait_min <= self.wait_max) {
            return Err(ConfigError::InvalidWaitRange {
                min: self.wait_min,
                max: self.wait_max,
            });
        }
        let wait = WaitTime::between(
            Duration::from_secs_f64(self.wait_min),
            Duration::from_secs_f64(self.wait_max),
        )?;

        let tasks = if self.tasks.is_empty() {
            TaskSet::uniform()
        } else {
            let selected = self
                .tasks
                .iter()
                .map(|name| name.parse::<UserTask>())
                .collect::<Result<Vec<_>, _>>()?;
            TaskSet::only(&selected)?
        };

        let plan = RunPlan {
            users: self.users.unwrap_or(profile.users),
            spawn_rate: self.spawn_rate.unwrap_or(profile.spawn_rate),
            duration,
            wait,
            tasks,
        };
        plan.validate()?;
        Ok(plan)
    }
}
