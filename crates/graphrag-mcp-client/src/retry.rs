//! Backoff schedule and session-reset predicate for tool calls.

use std::time::Duration;

use crate::error::ClientError;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default backoff unit
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Retry policy for tool calls.
///
/// Backoff is linear: the wait after failed attempt `n` (0-based) is
/// `(n + 1) * unit`, so the default schedule is 1 s then 2 s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Linear backoff
    Linear {
        /// Backoff unit
        unit: Duration,
        /// Retries after the first attempt
        max_retries: u32,
    },
    /// Never retry
    Never,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Linear {
            unit: DEFAULT_BACKOFF_UNIT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Linear policy with the given unit and retry count
    pub fn linear(unit: Duration, max_retries: u32) -> Self {
        Self::Linear { unit, max_retries }
    }

    /// Retries allowed after the first attempt
    pub fn max_retries(&self) -> u32 {
        match self {
            Self::Linear { max_retries, .. } => *max_retries,
            Self::Never => 0,
        }
    }

    /// Total attempts, first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retries().saturating_add(1)
    }

    /// Same schedule with a different retry count.
    ///
    /// `Never` keeps the default unit if retries are asked for.
    pub fn with_max_retries(self, max_retries: u32) -> Self {
        match self {
            Self::Linear { unit, .. } => Self::Linear { unit, max_retries },
            Self::Never if max_retries == 0 => Self::Never,
            Self::Never => Self::Linear {
                unit: DEFAULT_BACKOFF_UNIT,
                max_retries,
            },
        }
    }

    /// Wait before the next attempt, after attempt `attempt` (0-based) failed.
    ///
    /// `None` once the retry budget is spent.
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::Linear { unit, max_retries } => {
                if attempt >= *max_retries {
                    return None;
                }
                Some(unit.saturating_mul(attempt.saturating_add(1)))
            }
            Self::Never => None,
        }
    }
}

/// Whether the held session must be dropped before retrying after `error`.
///
/// Every retryable failure resets the session, including failures (such as
/// an unparseable stream) that say nothing about the session itself.
pub fn resets_session(error: &ClientError) -> bool {
    error.is_retryable()
}
