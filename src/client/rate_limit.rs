//! Sliding-window rate limiter for outbound probe requests.
//!
//! The limiter is an ordinary value; there is no process-wide instance.
//! The probe runner builds one per run, and callers that want several runs
//! to share a budget pass their own.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Result of asking the limiter for a request slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// The request may proceed; the slot has been recorded.
    Allowed,
    /// The window is full.
    Denied {
        /// Time until the oldest request leaves the window.
        retry_after: Duration,
    },
}

impl Acquire {
    /// Retry delay rounded up to whole seconds, or `None` when allowed.
    #[must_use]
    pub fn retry_after_seconds(self) -> Option<u64> {
        match self {
            Self::Allowed => None,
            Self::Denied { retry_after } => {
                let secs = retry_after.as_secs();
                Some(if retry_after.subsec_nanos() > 0 { secs + 1 } else { secs })
            }
        }
    }
}

/// Snapshot of the limiter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Requests still available in the current window.
    pub remaining: u32,
    /// Requests allowed per window.
    pub total: u32,
    /// Time until the window frees its oldest slot (full window when idle).
    pub reset_in: Duration,
}

/// Sliding-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window`.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    /// Try to take a slot at the current instant.
    pub fn try_acquire(&self) -> Acquire {
        self.try_acquire_at(Instant::now())
    }

    /// Try to take a slot at `now`.
    pub fn try_acquire_at(&self, now: Instant) -> Acquire {
        self.try_acquire_many_at(1, now)
    }

    /// Try to take `count` slots at once at the current instant.
    pub fn try_acquire_many(&self, count: u32) -> Acquire {
        self.try_acquire_many_at(count, Instant::now())
    }

    /// Try to take `count` slots at once at `now`. Either all are taken or none.
    pub fn try_acquire_many_at(&self, count: u32, now: Instant) -> Acquire {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict(&mut requests, now);

        let count = count as usize;
        let max = self.max_requests as usize;
        if count > max {
            return Acquire::Denied {
                retry_after: self.window,
            };
        }

        let overflow = (requests.len() + count).saturating_sub(max);
        if overflow > 0 {
            // The slot that frees last among the ones we need.
            let retry_after = requests
                .get(overflow - 1)
                .map_or(self.window, |at| (*at + self.window).saturating_duration_since(now));
            return Acquire::Denied { retry_after };
        }

        requests.extend(std::iter::repeat(now).take(count));
        Acquire::Allowed
    }

    /// Current limiter state.
    #[must_use]
    pub fn status(&self) -> RateLimitStatus {
        self.status_at(Instant::now())
    }

    /// Limiter state at `now`.
    #[must_use]
    pub fn status_at(&self, now: Instant) -> RateLimitStatus {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict(&mut requests, now);

        let used = u32::try_from(requests.len()).unwrap_or(u32::MAX);
        let reset_in = requests
            .front()
            .map_or(self.window, |oldest| (*oldest + self.window).saturating_duration_since(now));

        RateLimitStatus {
            remaining: self.max_requests.saturating_sub(used),
            total: self.max_requests,
            reset_in,
        }
    }

    /// Forget all recorded requests.
    pub fn reset(&self) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn evict(&self, requests: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = requests.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                requests.pop_front();
            } else {
                break;
            }
        }
    }
}
