//! Optional client-side request pacing.

use std::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive requests.
///
/// A zero interval never sleeps, which is the default: TMDB listings are
/// fetched back to back unless the operator opts in.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Last request timestamp.
    last_request: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a rate limiter that never waits.
    pub(crate) const fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Waits until the next request is allowed.
    pub async fn wait(&mut self) {
        if self.min_interval.is_zero() {
            return;
        }

        let now = Instant::now();

        if let Some(last) = self.last_request {
            let elapsed = now.duration_since(last);
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval.saturating_sub(elapsed)).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}
