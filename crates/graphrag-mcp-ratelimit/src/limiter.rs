//! Minimum-interval limiter.

use std::future::Future;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::debug;

use crate::clock::{Clock, TokioClock};

/// Default spacing between two gated calls
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

static GLOBAL: LazyLock<RateLimiter> = LazyLock::new(RateLimiter::default);

/// Limiter configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum time between the end of one call and the start of the next
    pub min_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new configuration with the default interval
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum interval
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }
}

/// Serializes calls and spaces them at least `min_interval` apart.
///
/// The lock is held while waiting and while the call runs. The timestamp is
/// recorded when the call ends, whether it completes or is cancelled, so a
/// dropped call still delays the next one.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    clock: Arc<dyn Clock>,
    last_call: Mutex<Option<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

impl RateLimiter {
    /// Create a limiter on the tokio clock
    pub fn new(config: RateLimiterConfig) -> Self {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Create a limiter on a custom clock
    pub fn with_clock(config: RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            last_call: Mutex::new(None),
        }
    }

    /// Process-wide limiter with the default interval
    pub fn global() -> &'static RateLimiter {
        &GLOBAL
    }

    /// Configured minimum interval
    pub fn min_interval(&self) -> Duration {
        self.config.min_interval
    }

    /// Run `f` once the interval since the previous call has elapsed.
    ///
    /// The output of `f`, including any error it carries, is returned
    /// unchanged.
    pub async fn call<F, Fut, T>(&self, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = self.clock.now().saturating_duration_since(previous);
            if elapsed < self.config.min_interval {
                let wait = self.config.min_interval - elapsed;
                debug!(
                    wait_ms = wait.as_millis() as u64,
                    min_interval_ms = self.config.min_interval.as_millis() as u64,
                    "Rate limiter delaying call"
                );
                self.clock.sleep(wait).await;
            }
        }

        let _stamp = StampOnDrop {
            last_call,
            clock: self.clock.as_ref(),
        };
        f().await
    }
}

/// Holds the limiter lock for the duration of a call and records its end.
struct StampOnDrop<'a> {
    last_call: MutexGuard<'a, Option<Instant>>,
    clock: &'a dyn Clock,
}

impl Drop for StampOnDrop<'_> {
    fn drop(&mut self) {
        *self.last_call = Some(self.clock.now());
    }
}
