//! Reveal Scheduler
//!
//! Timing for the simulated typing reveal, plus the one delay primitive the
//! core suspends on.
//!
//! # Typing Model
//!
//! A unit "types" at a constant rate of one character per
//! `per_character` delay, then rests for `base` before the next unit starts:
//!
//! ```text
//! plan_duration(unit) = base + per_character * chars(unit)
//! ```
//!
//! # Timers
//!
//! [`RevealScheduler::after`] spawns a tokio timer task and returns a
//! [`TimerHandle`]. Firing and cancelling race through one atomic state
//! (`PENDING -> FIRED | CANCELLED`), so exactly one of them wins and a
//! cancelled timer never runs its callback.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Reveal timing constants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    /// Fixed rest added to every unit's reveal
    pub base: Duration,
    /// Time to type one character (must be non-zero)
    pub per_character: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            per_character: Duration::from_millis(30),
        }
    }
}

/// Computes reveal durations and schedules cancellable delays
#[derive(Clone, Debug, Default)]
pub struct RevealScheduler {
    timing: RevealTiming,
}

impl RevealScheduler {
    /// Create a scheduler with the given timing
    #[must_use]
    pub fn new(timing: RevealTiming) -> Self {
        Self { timing }
    }

    /// The timing constants in use
    #[must_use]
    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    /// How long the reveal of `unit` occupies
    #[must_use]
    pub fn plan_duration(&self, unit: &str) -> Duration {
        let chars = u32::try_from(unit.chars().count()).unwrap_or(u32::MAX);
        self.timing
            .base
            .saturating_add(self.timing.per_character.saturating_mul(chars))
    }

    /// Number of characters of `unit` shown after `elapsed` of its reveal
    #[must_use]
    pub fn typed_chars(&self, unit: &str, elapsed: Duration) -> usize {
        let total = unit.chars().count();
        let per_char = self.timing.per_character.as_nanos();
        if per_char == 0 {
            return total;
        }
        let typed = elapsed.as_nanos() / per_char;
        usize::try_from(typed).map_or(total, |typed| typed.min(total))
    }

    /// Run `callback` once after `delay`
    ///
    /// Must be called from within a tokio runtime. The callback runs on the
    /// timer task, so it should only hand work back to the owner (e.g. send
    /// on a channel) rather than touch shared state directly.
    pub fn after<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let state = Arc::new(AtomicU8::new(PENDING));
        let timer_state = Arc::clone(&state);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if timer_state
                .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                callback();
            }
        });

        TimerHandle {
            state,
            task: task.abort_handle(),
        }
    }
}

/// Cancellation handle for a timer scheduled with [`RevealScheduler::after`]
#[derive(Debug)]
pub struct TimerHandle {
    state: Arc<AtomicU8>,
    task: AbortHandle,
}

impl TimerHandle {
    /// Prevent the callback from running
    ///
    /// Idempotent; a no-op once the timer has fired. Returns `true` only for
    /// the call that actually cancelled a pending timer.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            self.task.abort();
        }
        cancelled
    }

    /// Still waiting to fire
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }

    /// The callback has run (or is running)
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }

    /// Cancelled before it could fire
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }
}
