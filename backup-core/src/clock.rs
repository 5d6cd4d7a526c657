use chrono::{DateTime, SecondsFormat, Utc};
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

/// Source of the current time for backup ids and timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that advances by a fixed step on every read.
///
/// Gives every save its own millisecond so generated ids never collide.
/// Other crates get it with the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: chrono::Duration,
}

#[cfg(any(test, feature = "test-util"))]
impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for SteppingClock {
    fn default() -> Self {
        Self::new(Utc::now(), chrono::Duration::milliseconds(1))
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = *next;
        *next = now + self.step;
        now
    }
}

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// The fixed width and the UTC suffix keep lexical order equal to
/// chronological order, which the retrieve path relies on when sorting.
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
