//! Pluggable time sources.
//!
//! Limiters never read host time directly; they ask a [`Clock`] handed to them
//! at construction. Production code uses [`SystemClock`], tests use
//! [`SimulatedClock`] and move time forward by hand.
//!
//! | Clock | `now` | `sleep` / `after` | `advance` |
//! |-------|-------|-------------------|-----------|
//! | System | monotonic wall time | host timers | sleeps, then reports the new time |
//! | Simulated | manually set | wait for `advance` | jumps forward and fires due timers |

use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::types::Timestamp;

pub mod simulated_clock;
pub use simulated_clock::SimulatedClock;

pub mod system_clock;
pub use system_clock::SystemClock;

/// Time source used by every limiter.
///
/// Time reported by `now` never decreases. Durations are unsigned, so asking
/// for a timer in the past cannot be expressed.
pub trait Clock: Send + Sync {
    /// Current time on this clock.
    fn now(&self) -> Timestamp;

    /// Blocks the calling thread until `duration` has elapsed on this clock.
    fn sleep(&self, duration: Duration);

    /// Returns a receiver that gets exactly one message, the clock time at
    /// delivery, once this clock reaches `now() + duration`.
    ///
    /// The notification is sent without blocking. If nobody is listening it is
    /// dropped.
    fn after(&self, duration: Duration) -> Receiver<Timestamp>;

    /// Moves time forward by `duration` and returns the new current time.
    fn advance(&self, duration: Duration) -> Timestamp;
}
