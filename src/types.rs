//! Numeric and time types shared by the clocks and limiters.
//!
//! `Uint` is the integer type used for limits, counters and token counts.
//! The actual type is determined at compile time via feature flags.
//!
//! # Features
//! - `count-u64` (default): uses [`u64`] as `Uint`
//! - `count-u128`: uses [`u128`] as `Uint`
//!   (Both features cannot be enabled at the same time.)
//! - If neither feature is enabled, `u64` is used as the default type.

use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// Alias for the unsigned integer type used for limits, counters and tokens.
///
/// > **Note:** Enabling both `count-u64` and `count-u128` at the same time
///   will result in a compile error. If neither is enabled, [`u64`] is used.
#[cfg(all(feature = "count-u64", feature = "count-u128"))]
compile_error!("You cannot enable both `count-u64` and `count-u128` features at the same time");

#[cfg(all(feature = "count-u64", not(feature = "count-u128")))]
pub type Uint = u64;

#[cfg(all(feature = "count-u128", not(feature = "count-u64")))]
pub type Uint = u128;

#[cfg(not(any(feature = "count-u64", feature = "count-u128")))]
pub type Uint = u64;

/// A point on a clock's timeline.
///
/// Stored as the offset from the clock's epoch: the UNIX epoch for
/// [`SystemClock`](crate::clock::SystemClock), zero for a fresh
/// [`SimulatedClock`](crate::clock::SimulatedClock). Timestamps from different
/// clocks are not comparable in any meaningful way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// The clock epoch.
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    pub const fn from_duration(since_epoch: Duration) -> Self {
        Timestamp(since_epoch)
    }

    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    #[inline]
    pub fn saturating_duration_since(&self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn checked_add(&self, duration: Duration) -> Option<Timestamp> {
        self.0.checked_add(duration).map(Timestamp)
    }

    #[inline]
    pub fn saturating_add(&self, duration: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(duration))
    }

    /// Steps back by `duration`, stopping at the epoch.
    #[inline]
    pub fn saturating_sub(&self, duration: Duration) -> Timestamp {
        Timestamp(self.0.saturating_sub(duration))
    }

    /// Rounds down to a multiple of `window` since the epoch.
    ///
    /// A zero `window` returns the timestamp unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use tenant_guard::Timestamp;
    ///
    /// let ts = Timestamp::from_duration(Duration::from_secs(125));
    /// let floored = ts.truncate(Duration::from_secs(60));
    /// assert_eq!(floored, Timestamp::from_duration(Duration::from_secs(120)));
    /// ```
    pub fn truncate(&self, window: Duration) -> Timestamp {
        let window_nanos = window.as_nanos();
        if window_nanos == 0 {
            return *self;
        }
        let nanos = self.0.as_nanos();
        let floored = nanos - nanos % window_nanos;
        Timestamp(nanos_to_duration(floored))
    }
}

fn nanos_to_duration(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = (nanos / NANOS_PER_SEC).min(u64::MAX as u128) as u64;
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    /// # Panics
    /// Panics on overflow, like `Duration + Duration`.
    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.0.as_secs(), self.0.subsec_nanos())
    }
}
