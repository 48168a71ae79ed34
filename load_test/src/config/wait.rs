// Think time between tasks

use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;

/// Idle period a user waits between two tasks, drawn uniformly from `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitTime {
    min: Duration,
    max: Duration,
}

impl WaitTime {
    pub fn between(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidWaitRange {
                min: min.as_secs_f64(),
                max: max.as_secs_f64(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn constant(wait: Duration) -> Self {
        Self {
            min: wait,
            max: wait,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for WaitTime {
    /// Between one and three seconds
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}
