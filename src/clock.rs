//! Time source and simulated latency
//!
//! The ledger never calls `Utc::now()` or `tokio::time::sleep` directly so
//! that tests can run the full purchase/consume flow without real delays.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::sync::Mutex;
use std::time::Duration;

pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;

    /// Suspend for the given simulated latency
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Real clock backed by `chrono` and the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Deterministic clock for tests
///
/// `sleep` resolves immediately and advances `now()` by the requested
/// duration.
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<ManualState>,
}

#[derive(Debug)]
struct ManualState {
    now: DateTime<Utc>,
    slept: Duration,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(ManualState {
                now: start,
                slept: Duration::ZERO,
            }),
        }
    }

    /// Move time forward without counting it as simulated latency
    pub fn advance(&self, duration: Duration) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.now += chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    }

    /// Total latency requested through `sleep`
    pub fn total_slept(&self) -> Duration {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).slept
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).now
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            state.now += chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
            state.slept += duration;
        }
        Box::pin(futures::future::ready(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_manual_clock_sleep_advances_time() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);

        clock.sleep(Duration::from_millis(500)).await;
        clock.sleep(Duration::from_millis(2000)).await;

        assert_eq!(clock.total_slept(), Duration::from_millis(2500));
        assert_eq!(clock.now(), start + chrono::Duration::milliseconds(2500));
    }

    #[test]
    fn test_advance_is_not_latency() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.total_slept(), Duration::ZERO);
        assert_eq!(clock.now(), start + chrono::Duration::seconds(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_system_clock_uses_tokio_timer() {
        let before = tokio::time::Instant::now();
        SystemClock.sleep(Duration::from_millis(2000)).await;
        assert!(before.elapsed() >= Duration::from_millis(2000));
    }
}
