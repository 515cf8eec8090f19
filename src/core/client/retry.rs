use std::num::NonZeroU32;
use std::time::Duration;

/// Configuration for polling an asynchronous job until its reply is ready.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// The maximum number of retrieval attempts.
    pub attempts: NonZeroU32,
    /// The delay between two attempts.
    pub interval: Duration,
    /// The timeout applied to each individual retrieval call.
    pub per_attempt_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: NonZeroU32::new(120).unwrap_or(NonZeroU32::MIN),
            interval: Duration::from_secs(5),
            per_attempt_timeout: Duration::from_secs(15),
        }
    }
}

impl PollConfig {
    /// Builds a config from plain values; `attempts` of zero is raised to one.
    pub fn new(attempts: u32, interval: Duration, per_attempt_timeout: Duration) -> Self {
        Self {
            attempts: NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN),
            interval,
            per_attempt_timeout,
        }
    }

    /// Total time spent sleeping for one job when no attempt comes back ready.
    /// There is no sleep after the last attempt.
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.attempts.get() - 1)
    }
}
