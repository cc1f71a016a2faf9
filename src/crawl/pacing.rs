// src/crawl/pacing.rs
// =============================================================================
// Politeness delay applied before every request.
//
// - wait_secs = 0: no delay at all
// - randomize = false: always sleep exactly wait_secs
// - randomize = true: sleep a whole number of seconds picked uniformly
//   in [1, wait_secs]
// =============================================================================

use std::time::Duration;

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub wait_secs: u64,
    pub randomize: bool,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            wait_secs: 5,
            randomize: true,
        }
    }
}

impl Pacing {
    pub fn new(wait_secs: u64, randomize: bool) -> Self {
        Self {
            wait_secs,
            randomize,
        }
    }

    pub fn disabled() -> Self {
        Self::new(0, false)
    }

    pub fn is_enabled(&self) -> bool {
        self.wait_secs > 0
    }

    /// Delay to apply before the next request, if any.
    pub fn next_delay(&self) -> Option<Duration> {
        if !self.is_enabled() {
            return None;
        }

        let secs = if self.randomize {
            fastrand::u64(1..=self.wait_secs)
        } else {
            self.wait_secs
        };

        Some(Duration::from_secs(secs))
    }

    /// Sleeps for `next_delay()`. Runs to completion once started.
    pub async fn pause(&self) {
        if let Some(delay) = self.next_delay() {
            debug!("waiting {}s before next request", delay.as_secs());
            tokio::time::sleep(delay).await;
        }
    }
}
