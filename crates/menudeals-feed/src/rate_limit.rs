//! Per-caller sliding-window request limiter.
//!
//! Each caller identity owns a queue of request timestamps. A request is
//! allowed while fewer than `quota` timestamps are younger than `window`.
//! Expired timestamps are dropped lazily whenever that identity is touched;
//! [`SlidingWindowLimiter::cleanup`] removes identities whose queues have
//! fully expired.
//!
//! All operations on one limiter serialize on a single mutex, so the
//! evict-check-record sequence in [`SlidingWindowLimiter::allow`] is atomic
//! and concurrent callers can never push an identity past its quota.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

pub const DEFAULT_QUOTA: usize = 5;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Source of the current time for the limiter.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// A clock that only moves when told to. Used by tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += to_delta(by);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of [`SlidingWindowLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the window after this decision.
    pub remaining: usize,
    /// When the oldest counted request leaves the window. Equal to the
    /// current time when nothing is counted.
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SlidingWindowLimiter<C: Clock = SystemClock> {
    quota: usize,
    window: TimeDelta,
    clock: C,
    history: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl SlidingWindowLimiter<SystemClock> {
    #[must_use]
    pub fn new(quota: usize, window: Duration) -> Self {
        Self::with_clock(quota, window, SystemClock)
    }
}

impl Default for SlidingWindowLimiter<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA, DEFAULT_WINDOW)
    }
}

impl<C: Clock> SlidingWindowLimiter<C> {
    #[must_use]
    pub fn with_clock(quota: usize, window: Duration, clock: C) -> Self {
        Self {
            quota,
            window: to_delta(window),
            clock,
            history: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn quota(&self) -> usize {
        self.quota
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window.to_std().unwrap_or(Duration::MAX)
    }

    /// Records a request for `identity` if it is under quota.
    ///
    /// Returns `false` when the quota is exhausted; nothing is recorded then.
    pub fn allow(&self, identity: &str) -> bool {
        self.check(identity).allowed
    }

    /// [`allow`](Self::allow) plus the remaining quota and reset time, all
    /// computed under one lock.
    pub fn check(&self, identity: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let mut history = self.lock();
        let stamps = history.entry(identity.to_owned()).or_default();
        evict_expired(stamps, now, self.window);

        let allowed = stamps.len() < self.quota;
        if allowed {
            stamps.push_back(now);
        } else {
            tracing::debug!(identity, quota = self.quota, "rate limit denied request");
        }

        let remaining = self.quota.saturating_sub(stamps.len());
        let reset_at = self.reset_from(stamps, now);
        if stamps.is_empty() {
            history.remove(identity);
        }

        RateLimitDecision {
            allowed,
            remaining,
            reset_at,
        }
    }

    /// Requests `identity` may still make in the current window.
    pub fn remaining(&self, identity: &str) -> usize {
        let now = self.clock.now();
        let mut history = self.lock();
        let Some(stamps) = history.get_mut(identity) else {
            return self.quota;
        };
        evict_expired(stamps, now, self.window);
        self.quota.saturating_sub(stamps.len())
    }

    /// When `identity`'s oldest counted request expires, or now if it has none.
    pub fn reset_at(&self, identity: &str) -> DateTime<Utc> {
        let now = self.clock.now();
        let mut history = self.lock();
        match history.get_mut(identity) {
            Some(stamps) => {
                evict_expired(stamps, now, self.window);
                self.reset_from(stamps, now)
            }
            None => now,
        }
    }

    /// Drops every identity with no timestamps left in the window.
    ///
    /// Returns how many identities were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut history = self.lock();
        let before = history.len();
        history.retain(|_, stamps| {
            evict_expired(stamps, now, self.window);
            !stamps.is_empty()
        });
        let removed = before - history.len();
        tracing::debug!(
            removed,
            tracked = history.len(),
            "rate limiter cleanup sweep"
        );
        removed
    }

    /// Number of identities currently holding state.
    pub fn tracked_identities(&self) -> usize {
        self.lock().len()
    }

    fn reset_from(&self, stamps: &VecDeque<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
        stamps
            .front()
            .map_or(now, |oldest| {
                oldest.checked_add_signed(self.window).unwrap_or(*oldest)
            })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<DateTime<Utc>>>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pops timestamps at least `window` old. Timestamps are pushed in clock
/// order, so the expired ones are always at the front.
fn evict_expired(stamps: &mut VecDeque<DateTime<Utc>>, now: DateTime<Utc>, window: TimeDelta) {
    while let Some(oldest) = stamps.front() {
        if now.signed_duration_since(*oldest) >= window {
            stamps.pop_front();
        } else {
            break;
        }
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
