use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Restart pacing for a `RestartOnExit` process.
///
/// The default matches the base supervisor behavior: restart forever,
/// immediately, with no backoff. Both knobs can be tightened per spec
/// without changing that default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestartSettings {
    /// Delay before the first restart attempt (in seconds)
    #[serde(default)]
    pub initial_delay_secs: u64,

    /// Backoff strategy applied to subsequent attempts
    #[serde(default)]
    pub backoff: BackoffStrategy,

    /// Maximum number of restarts; `None` means unbounded
    #[serde(default)]
    pub max_restarts: Option<usize>,
}

impl Default for RestartSettings {
    fn default() -> Self {
        Self {
            initial_delay_secs: 0,
            backoff: BackoffStrategy::Fixed,
            max_restarts: None,
        }
    }
}

impl RestartSettings {
    /// Check if another restart should be attempted.
    pub fn should_restart(&self, tracker: &RestartTracker) -> bool {
        match self.max_restarts {
            Some(max) => tracker.restart_count() < max,
            None => true,
        }
    }

    /// Calculate the delay before the next restart attempt.
    pub fn calculate_delay(&self, tracker: &RestartTracker) -> Duration {
        self.backoff
            .calculate_delay(self.initial_delay_secs, tracker.restart_count())
    }
}

/// Backoff strategy for restart delays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// Fixed delay between restarts
    #[default]
    Fixed,
    /// Exponential backoff with maximum delay
    Exponential { max_delay_secs: u64 },
}

impl BackoffStrategy {
    /// Calculate the delay for a given restart attempt
    pub fn calculate_delay(&self, initial_delay_secs: u64, restart_count: usize) -> Duration {
        match self {
            BackoffStrategy::Fixed => Duration::from_secs(initial_delay_secs),
            BackoffStrategy::Exponential { max_delay_secs } => {
                // delay = initial * 2^restart_count, capped
                let delay_secs = initial_delay_secs
                    .saturating_mul(2_u64.saturating_pow(restart_count as u32))
                    .min(*max_delay_secs);
                Duration::from_secs(delay_secs)
            }
        }
    }
}

/// Tracks restart history for a single managed process
#[derive(Debug, Clone, Default)]
pub struct RestartTracker {
    restart_times: Vec<SystemTime>,
}

impl RestartTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a restart attempt
    pub fn record_restart(&mut self) {
        self.restart_times.push(SystemTime::now());
    }

    /// Get the total number of restarts
    pub fn restart_count(&self) -> usize {
        self.restart_times.len()
    }

    /// Get the time of the last restart, if any
    pub fn last_restart_time(&self) -> Option<SystemTime> {
        self.restart_times.last().copied()
    }
}
