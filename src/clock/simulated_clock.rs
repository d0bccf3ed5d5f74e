use std::sync::mpsc::{self, Receiver, SyncSender};
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::types::Timestamp;

/// Manually driven clock for deterministic tests.
///
/// Time only moves when [`advance`](Clock::advance) is called. Timers created
/// with [`after`](Clock::after) or [`sleep`](Clock::sleep) fire during the
/// `advance` call that reaches their scheduled time.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tenant_guard::clock::{Clock, SimulatedClock};
///
/// let clock = SimulatedClock::new();
/// let timer = clock.after(Duration::from_secs(10));
///
/// clock.advance(Duration::from_secs(5));
/// assert!(timer.try_recv().is_err());
///
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(timer.try_recv().unwrap().as_duration(), Duration::from_secs(10));
/// ```
#[derive(Debug, Default)]
pub struct SimulatedClock {
    state: Mutex<SimulatedClockState>,
}

#[derive(Debug, Default)]
struct SimulatedClockState {
    current: Timestamp,
    timers: Vec<PendingTimer>,
}

#[derive(Debug)]
struct PendingTimer {
    scheduled: Timestamp,
    notify: SyncSender<Timestamp>,
}

impl SimulatedClock {
    /// Creates a clock at [`Timestamp::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock at `start`.
    pub fn starting_at(start: Timestamp) -> Self {
        SimulatedClock {
            state: Mutex::new(SimulatedClockState {
                current: start,
                timers: Vec::new(),
            }),
        }
    }

    /// Number of timers still waiting for their scheduled time.
    pub fn pending_timers(&self) -> usize {
        self.state.lock().timers.len()
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Timestamp {
        self.state.lock().current
    }

    /// Blocks until another thread advances this clock past `duration`.
    fn sleep(&self, duration: Duration) {
        // A disconnect cannot happen: the sender lives in the timer list
        // until it fires.
        let _ = self.after(duration).recv();
    }

    fn after(&self, duration: Duration) -> Receiver<Timestamp> {
        let (notify, receiver) = mpsc::sync_channel(1);
        let mut state = self.state.lock();
        let scheduled = state.current.saturating_add(duration);
        if scheduled <= state.current {
            let _ = notify.try_send(state.current);
        } else {
            tracing::trace!(%scheduled, "simulated timer registered");
            state.timers.push(PendingTimer { scheduled, notify });
        }
        receiver
    }

    fn advance(&self, duration: Duration) -> Timestamp {
        let mut state = self.state.lock();
        let current = state.current.saturating_add(duration);
        state.current = current;

        let before = state.timers.len();
        state.timers.retain(|timer| {
            if timer.scheduled <= current {
                // Non-blocking: a full or abandoned channel drops the tick.
                let _ = timer.notify.try_send(current);
                false
            } else {
                true
            }
        });
        let fired = before - state.timers.len();
        if fired > 0 {
            tracing::trace!(%current, fired, "simulated timers fired");
        }
        current
    }
}
