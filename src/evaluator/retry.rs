use crate::evaluator::llm_client::GenerationOutcome;
use std::time::Duration;

/// Bounded retry for transient provider outcomes.
///
/// Each transient sentinel gets a fixed cooldown before the next attempt.
/// There is no backoff growth: the default allows exactly one retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub rate_limited_cooldown: Duration,
    pub unavailable_cooldown: Duration,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        rate_limited_cooldown: Duration,
        unavailable_cooldown: Duration,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            rate_limited_cooldown,
            unavailable_cooldown,
        }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Cooldown to observe before retrying `outcome`, or `None` when the
    /// outcome is final.
    pub fn cooldown_for(&self, outcome: &GenerationOutcome) -> Option<Duration> {
        match outcome {
            GenerationOutcome::RateLimited => Some(self.rate_limited_cooldown),
            GenerationOutcome::ServiceUnavailable => Some(self.unavailable_cooldown),
            GenerationOutcome::Text(_) | GenerationOutcome::Error(_) => None,
        }
    }

    pub fn allows_attempt(&self, attempt: u32) -> bool {
        attempt <= self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(61), Duration::from_secs(10))
    }
}
