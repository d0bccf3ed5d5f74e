use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::limiters::registry::TenantRegistry;
use crate::rate_limit::TenantRateLimit;
use crate::{AdmissionResult, RateLimitError, Timestamp, Uint};

/// Per-tenant fixed window counter.
///
/// Time is divided into windows of `window` duration aligned to the clock
/// epoch. Each tenant may be admitted `limit` times per window; the counter
/// resets when a request arrives at least one window after the current window
/// started.
///
/// # Window Boundaries
///
/// Windows are aligned to multiples of `window`:
/// - Window 0: [0, window)
/// - Window 1: [window, 2*window)
/// - And so on...
///
/// A tenant can therefore spend its whole limit at the end of one window and
/// again at the start of the next, up to `2 * limit` requests in a short span.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tenant_guard::clock::{Clock, SimulatedClock};
/// use tenant_guard::limiters::FixedWindowLimiter;
///
/// let clock = Arc::new(SimulatedClock::new());
/// let limiter = FixedWindowLimiter::new(Duration::from_secs(60), clock.clone());
/// limiter.set_rate_limit("foo", 2).unwrap();
///
/// assert_eq!(limiter.allow("foo"), Ok(true));
/// assert_eq!(limiter.allow("foo"), Ok(true));
/// assert_eq!(limiter.allow("foo"), Ok(false));
///
/// // Next window: counter resets
/// clock.advance(Duration::from_secs(60));
/// assert_eq!(limiter.allow("foo"), Ok(true));
/// ```
pub struct FixedWindowLimiter {
    /// Length of every window
    window: Duration,
    clock: Arc<dyn Clock>,
    tenants: TenantRegistry<FixedWindowState>,
}

/// Internal state of one tenant
#[derive(Debug)]
struct FixedWindowState {
    /// Window-aligned start of the current window
    window_start: Timestamp,
    /// Admissions granted in the current window
    counter: Uint,
    /// Admissions allowed per window
    limit: Uint,
    /// Last time the tenant was configured or checked
    last_seen: Timestamp,
}

/// Read-only view of a tenant's window at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStatus {
    pub window_start: Timestamp,
    pub counter: Uint,
    pub limit: Uint,
    pub remaining: Uint,
}

impl FixedWindowLimiter {
    /// Creates a limiter with windows of `window` duration.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        assert!(window > Duration::ZERO, "window must be greater than 0");

        FixedWindowLimiter {
            window,
            clock,
            tenants: TenantRegistry::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Registers `tenant` with `limit` admissions per window, or changes the
    /// limit of an existing tenant.
    ///
    /// A new tenant starts with an empty window aligned to the current time.
    /// Updating a tenant keeps its in-progress window and counter.
    pub fn set_rate_limit(&self, tenant: &str, limit: Uint) -> Result<(), RateLimitError> {
        let now = self.clock.now();
        let window = self.window;
        self.tenants.with_store(|store| {
            if let Some(state) = store.get_mut(tenant) {
                state.limit = limit;
                state.last_seen = state.last_seen.max(now);
                tracing::debug!(tenant, limit, "fixed window limit updated");
            } else {
                store.insert(
                    tenant.to_owned(),
                    FixedWindowState {
                        window_start: now.truncate(window),
                        counter: 0,
                        limit,
                        last_seen: now,
                    },
                );
                tracing::debug!(
                    tenant,
                    limit,
                    window_start = %now.truncate(window),
                    "fixed window tenant registered"
                );
            }
        })
    }

    /// Checks and records one request for `tenant`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The request fits in the current window and was counted
    /// * `Ok(false)` - The window is exhausted; state is left untouched
    ///
    /// The first request of a new window is always admitted, even with a
    /// limit of 0.
    /// * `Err(RateLimitError::TenantNotConfigured)` - `set_rate_limit` was never called
    /// * `Err(RateLimitError::Uninitialized)` - The limiter has no tenant store
    pub fn allow(&self, tenant: &str) -> AdmissionResult {
        // Read the clock before taking the tenant lock; the two never nest.
        let now = self.clock.now();
        let window = self.window;

        self.tenants.with_tenant_mut(tenant, |state| {
            state.last_seen = state.last_seen.max(now);

            // A new window always admits its first request
            if now.saturating_duration_since(state.window_start) >= window {
                state.window_start = now.truncate(window);
                state.counter = 1;
                tracing::trace!(
                    tenant,
                    window_start = %state.window_start,
                    "fixed window rolled over"
                );
                return true;
            }

            let admitted = state.counter < state.limit;
            if admitted {
                state.counter += 1;
            }
            tracing::trace!(
                tenant,
                admitted,
                counter = state.counter,
                limit = state.limit,
                "fixed window check"
            );
            admitted
        })
    }

    /// Current limit of `tenant`.
    pub fn limit(&self, tenant: &str) -> Result<Uint, RateLimitError> {
        self.tenants.with_tenant(tenant, |state| state.limit)
    }

    /// Admissions still available to `tenant` in the window containing now.
    pub fn remaining(&self, tenant: &str) -> Result<Uint, RateLimitError> {
        self.window_status(tenant).map(|status| status.remaining)
    }

    /// Snapshot of `tenant`'s window as an `allow` call would see it now,
    /// without changing any state.
    pub fn window_status(&self, tenant: &str) -> Result<WindowStatus, RateLimitError> {
        let now = self.clock.now();
        let window = self.window;
        self.tenants.with_tenant(tenant, |state| {
            if now.saturating_duration_since(state.window_start) >= window {
                // The next check opens a new window and is admitted
                return WindowStatus {
                    window_start: now.truncate(window),
                    counter: 0,
                    limit: state.limit,
                    remaining: state.limit.max(1),
                };
            }
            WindowStatus {
                window_start: state.window_start,
                counter: state.counter,
                limit: state.limit,
                remaining: state.limit.saturating_sub(state.counter),
            }
        })
    }
}

impl Default for FixedWindowLimiter {
    /// A limiter with no tenant store. Every operation fails with
    /// [`RateLimitError::Uninitialized`]; use [`FixedWindowLimiter::new`].
    fn default() -> Self {
        FixedWindowLimiter {
            window: Duration::ZERO,
            clock: Arc::new(SystemClock::new()),
            tenants: TenantRegistry::detached(),
        }
    }
}

impl TenantRateLimit for FixedWindowLimiter {
    #[inline(always)]
    fn allow(&self, tenant: &str) -> AdmissionResult {
        self.allow(tenant)
    }

    fn contains_tenant(&self, tenant: &str) -> bool {
        self.tenants.contains(tenant)
    }

    fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    fn remove_tenant(&self, tenant: &str) -> bool {
        let removed = self.tenants.remove(tenant);
        if removed {
            tracing::debug!(tenant, "fixed window tenant removed");
        }
        removed
    }

    fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = self.clock.now().saturating_sub(max_idle);
        let evicted = self.tenants.retain_active_since(cutoff, |state| state.last_seen);
        if evicted > 0 {
            tracing::debug!(evicted, %cutoff, "idle fixed window tenants evicted");
        }
        evicted
    }
}

/// Construction-time configuration for a [`FixedWindowLimiter`].
#[derive(Debug, Clone)]
pub struct FixedWindowConfig {
    /// Length of every window.
    pub window: Duration,
}

impl FixedWindowConfig {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Builds the limiter on top of `clock`.
    ///
    /// # Panics
    /// Panics if `window` is zero.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> FixedWindowLimiter {
        FixedWindowLimiter::new(self.window, clock)
    }
}

impl From<FixedWindowConfig> for FixedWindowLimiter {
    /// Builds the limiter on a [`SystemClock`].
    ///
    /// # Panics
    /// Panics if `window` is zero.
    fn from(config: FixedWindowConfig) -> Self {
        config.with_clock(Arc::new(SystemClock::new()))
    }
}
