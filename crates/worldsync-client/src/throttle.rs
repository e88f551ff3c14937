//! Caller-owned push rate limiting

use std::time::{Duration, Instant};

/// Standard interval between pushes from a game observer
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(10);

/// Rate limiter owned by the observer-side caller.
///
/// The client itself imposes no rate limit; the observer keeps one of these
/// next to its client instance and pushes only when [`PushThrottle::ready`]
/// reports true. Never shared between observers.
#[derive(Clone, Debug)]
pub struct PushThrottle {
    period: Duration,
    last_push: Option<Instant>,
}

impl PushThrottle {
    pub fn new(period: Duration) -> Self {
        PushThrottle {
            period,
            last_push: None,
        }
    }

    /// Whether enough time has passed since the last recorded push.
    /// A fresh throttle is immediately ready.
    pub fn ready(&self) -> bool {
        self.last_push
            .map_or(true, |last| last.elapsed() >= self.period)
    }

    /// Record that a push happened now
    pub fn mark(&mut self) {
        self.last_push = Some(Instant::now());
    }
}

impl Default for PushThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}
