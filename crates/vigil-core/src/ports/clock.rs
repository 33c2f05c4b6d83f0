//! Clock port - time as a capability.
//!
//! The engine never calls `Local::now()` directly. Injecting the clock is
//! what makes day rollovers, cooldown expiry, and the 09:00 summary window
//! testable without real sleeps.

use chrono::{DateTime, Duration, Local};
use std::sync::{Arc, Mutex};

/// Provides the current local wall-clock time.
///
/// Local time is deliberate: working hours and the daily summary window
/// are anchored to the operator's day, not UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Test clock with a settable instant.
///
/// Cloning shares the underlying instant, so a test can hand one clone to
/// the engine and keep another to advance time.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
