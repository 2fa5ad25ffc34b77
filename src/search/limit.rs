//! Wall-clock budgets for cooperative cancellation.
//!
//! Searches hold a [`Deadline`] and poll it; nothing interrupts them from
//! outside.

use std::time::{Duration, Instant};

/// A search time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLimit {
    Unlimited,
    Limited(Duration),
}

impl TimeLimit {
    pub const fn millis(ms: u64) -> TimeLimit {
        TimeLimit::Limited(Duration::from_millis(ms))
    }

    /// Starts the clock.
    pub fn start(self) -> Deadline {
        Deadline {
            started: Instant::now(),
            limit: self,
        }
    }
}

/// A started time limit.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: TimeLimit,
}

impl Deadline {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// True once more than the limit has elapsed.
    pub fn expired(&self) -> bool {
        match self.limit {
            TimeLimit::Unlimited => false,
            TimeLimit::Limited(limit) => self.started.elapsed() > limit,
        }
    }

    /// Time left, or `None` for an unlimited deadline.
    pub fn remaining(&self) -> Option<Duration> {
        match self.limit {
            TimeLimit::Unlimited => None,
            TimeLimit::Limited(limit) => Some(limit.saturating_sub(self.started.elapsed())),
        }
    }
}
