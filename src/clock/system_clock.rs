use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::clock::Clock;
use crate::types::Timestamp;

/// Real-time clock backed by the host.
///
/// `now` is aligned to the UNIX epoch when the clock is created and then
/// advances with the monotonic clock, so wall-clock adjustments never move it
/// backwards.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
    origin_since_epoch: Duration,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
            origin_since_epoch: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.origin_since_epoch + self.origin.elapsed())
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }

    /// Spawns a short-lived timer thread per call.
    ///
    /// If the thread cannot be spawned the sender is dropped, so the receiver
    /// reports a disconnect instead of hanging forever.
    fn after(&self, duration: Duration) -> Receiver<Timestamp> {
        let (notify, receiver) = mpsc::sync_channel(1);
        let clock = *self;
        let spawned = thread::Builder::new()
            .name("tenant-guard-timer".into())
            .spawn(move || {
                thread::sleep(duration);
                let _ = notify.try_send(clock.now());
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn timer thread");
        }
        receiver
    }

    /// Real time cannot be forced forward: this sleeps for `duration`.
    fn advance(&self, duration: Duration) -> Timestamp {
        thread::sleep(duration);
        self.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn now_is_close_to_wall_time() {
        let clock = SystemClock::new();
        let wall = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
        let diff = if wall > clock.now().as_duration() {
            wall - clock.now().as_duration()
        } else {
            clock.now().as_duration() - wall
        };
        assert!(diff < Duration::from_secs(1));
    }

    #[test]
    fn after_delivers_once() {
        let clock = SystemClock::new();
        let start = clock.now();
        let fired = clock
            .after(Duration::from_millis(10))
            .recv_timeout(Duration::from_secs(5))
            .expect("timer should fire");
        assert!(fired.saturating_duration_since(start) >= Duration::from_millis(10));
    }

    #[test]
    fn advance_waits_for_real_time() {
        let clock = SystemClock::new();
        let start = clock.now();
        let after = clock.advance(Duration::from_millis(5));
        assert!(after.saturating_duration_since(start) >= Duration::from_millis(5));
    }
}
