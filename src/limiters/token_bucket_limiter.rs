use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::limiters::registry::TenantRegistry;
use crate::rate_limit::TenantRateLimit;
use crate::{AdmissionResult, RateLimitError, Timestamp, Uint};

/// Per-tenant token bucket.
///
/// Every tenant owns a pool of tokens. Each admitted request takes one token;
/// the pool is credited `rate` tokens for every whole second elapsed since the
/// last refill, capped at `burst`.
///
/// # Algorithm Behavior
///
/// - A tenant starts with `rate` tokens (one second's worth), not `burst`
/// - Elapsed time is truncated to whole seconds before it is multiplied by `rate`
/// - The refill timestamp moves to now on every refill, even when nothing was
///   credited, so sub-second gaps between calls never add up to a refill
/// - Requests are checked only after the refill
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tenant_guard::clock::{Clock, SimulatedClock};
/// use tenant_guard::limiters::TokenBucketLimiter;
///
/// let clock = Arc::new(SimulatedClock::new());
/// let limiter = TokenBucketLimiter::new(2, 10, clock.clone());
/// limiter.setup_token_bucket("foo").unwrap();
///
/// // Starts with `rate` tokens
/// assert_eq!(limiter.allow("foo"), Ok(true));
/// assert_eq!(limiter.allow("foo"), Ok(true));
/// assert_eq!(limiter.allow("foo"), Ok(false));
///
/// // One second later, `rate` more tokens are available
/// clock.advance(Duration::from_secs(1));
/// assert_eq!(limiter.allow("foo"), Ok(true));
/// ```
pub struct TokenBucketLimiter {
    /// Tokens credited per elapsed second
    rate: Uint,
    /// Maximum number of tokens a tenant can hold
    burst: Uint,
    clock: Arc<dyn Clock>,
    tenants: TenantRegistry<TokenBucketState>,
}

/// Internal state of one tenant's bucket
#[derive(Debug)]
struct TokenBucketState {
    /// Tokens currently available
    tokens: Uint,
    /// Time of the last refill
    last_refill: Timestamp,
}

impl TokenBucketState {
    /// Credits whole elapsed seconds, caps at `burst`, and moves the refill
    /// time to `now`. A `now` older than `last_refill` counts as zero elapsed.
    #[inline]
    fn refill(&mut self, now: Timestamp, rate: Uint, burst: Uint) {
        let elapsed_secs = now.saturating_duration_since(self.last_refill).as_secs() as Uint;
        let credited = rate.saturating_mul(elapsed_secs);
        self.tokens = self.tokens.saturating_add(credited).min(burst);
        self.last_refill = self.last_refill.max(now);
    }
}

/// A unit of work submitted on behalf of a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<T = ()> {
    pub tenant_id: String,
    pub value: T,
}

impl<T> Request<T> {
    pub fn new(tenant_id: impl Into<String>, value: T) -> Self {
        Request {
            tenant_id: tenant_id.into(),
            value,
        }
    }
}

impl TokenBucketLimiter {
    /// Creates a token bucket limiter.
    ///
    /// # Parameters
    ///
    /// * `rate` - Tokens credited per elapsed second, also the initial fill
    /// * `burst` - Maximum number of tokens per tenant
    /// * `clock` - Time source for refills
    ///
    /// # Panics
    ///
    /// Panics if `rate` or `burst` is zero.
    pub fn new(rate: Uint, burst: Uint, clock: Arc<dyn Clock>) -> Self {
        assert!(rate > 0, "rate must be greater than 0");
        assert!(burst > 0, "burst must be greater than 0");

        TokenBucketLimiter {
            rate,
            burst,
            clock,
            tenants: TenantRegistry::new(),
        }
    }

    pub fn rate(&self) -> Uint {
        self.rate
    }

    pub fn burst(&self) -> Uint {
        self.burst
    }

    /// Gives `tenant` a fresh bucket holding `rate` tokens.
    ///
    /// Calling it again for an existing tenant resets that tenant's bucket.
    ///
    /// # Returns
    /// * `Err(RateLimitError::Uninitialized)` - The limiter has no tenant store
    pub fn setup_token_bucket(&self, tenant: &str) -> Result<(), RateLimitError> {
        let now = self.clock.now();
        let tokens = self.rate;
        self.tenants.with_store(|store| {
            let previous = store.insert(
                tenant.to_owned(),
                TokenBucketState {
                    tokens,
                    last_refill: now,
                },
            );
            tracing::debug!(tenant, tokens, reset = previous.is_some(), "token bucket set up");
        })
    }

    /// Credits `tenant` for the whole seconds elapsed since its last refill.
    ///
    /// # Returns
    /// * `Err(RateLimitError::TenantNotConfigured)` - No bucket for `tenant`
    /// * `Err(RateLimitError::Uninitialized)` - The limiter has no tenant store
    pub fn refill_tokens(&self, tenant: &str) -> Result<(), RateLimitError> {
        let now = self.clock.now();
        let (rate, burst) = (self.rate, self.burst);
        self.tenants
            .with_tenant_mut(tenant, |state| state.refill(now, rate, burst))
    }

    /// Refills `tenant`'s bucket, then takes one token if any is left.
    ///
    /// Refill and check happen under one lock acquisition, so concurrent
    /// callers always see a fully applied prior state.
    ///
    /// # Returns
    /// * `Ok(true)` - A token was taken
    /// * `Ok(false)` - The bucket is empty
    /// * `Err(RateLimitError::TenantNotConfigured)` - No bucket for `tenant`
    /// * `Err(RateLimitError::Uninitialized)` - The limiter has no tenant store
    pub fn allow(&self, tenant: &str) -> AdmissionResult {
        let now = self.clock.now();
        let (rate, burst) = (self.rate, self.burst);
        self.tenants.with_tenant_mut(tenant, |state| {
            state.refill(now, rate, burst);

            let admitted = state.tokens > 0;
            if admitted {
                state.tokens -= 1;
            }
            tracing::trace!(tenant, admitted, tokens = state.tokens, "token bucket check");
            admitted
        })
    }

    /// Same as [`allow`](Self::allow) for the request's tenant.
    #[inline]
    pub fn allow_request<T>(&self, request: &Request<T>) -> AdmissionResult {
        self.allow(&request.tenant_id)
    }

    /// Tokens currently in `tenant`'s bucket, without refilling.
    pub fn tokens(&self, tenant: &str) -> Result<Uint, RateLimitError> {
        self.tenants.with_tenant(tenant, |state| state.tokens)
    }
}

impl Default for TokenBucketLimiter {
    /// A limiter with no tenant store. Every operation fails with
    /// [`RateLimitError::Uninitialized`]; use [`TokenBucketLimiter::new`].
    fn default() -> Self {
        TokenBucketLimiter {
            rate: 0,
            burst: 0,
            clock: Arc::new(SystemClock::new()),
            tenants: TenantRegistry::detached(),
        }
    }
}

impl TenantRateLimit for TokenBucketLimiter {
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
            tracing::debug!(tenant, "token bucket tenant removed");
        }
        removed
    }

    fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = self.clock.now().saturating_sub(max_idle);
        let evicted = self.tenants.retain_active_since(cutoff, |state| state.last_refill);
        if evicted > 0 {
            tracing::debug!(evicted, %cutoff, "idle token bucket tenants evicted");
        }
        evicted
    }
}

/// Construction-time configuration for a [`TokenBucketLimiter`].
#[derive(Debug, Clone)]
pub struct TokenBucketConfig {
    /// Tokens credited per elapsed second, also the initial fill.
    pub rate: Uint,
    /// Maximum number of tokens per tenant.
    pub burst: Uint,
}

impl TokenBucketConfig {
    pub fn new(rate: Uint, burst: Uint) -> Self {
        Self { rate, burst }
    }

    /// Builds the limiter on top of `clock`.
    ///
    /// # Panics
    /// Panics if `rate` or `burst` is zero.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> TokenBucketLimiter {
        TokenBucketLimiter::new(self.rate, self.burst, clock)
    }
}

impl From<TokenBucketConfig> for TokenBucketLimiter {
    /// Builds the limiter on a [`SystemClock`].
    ///
    /// # Panics
    /// Panics if `rate` or `burst` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use tenant_guard::limiters::{TokenBucketConfig, TokenBucketLimiter};
    ///
    /// let limiter: TokenBucketLimiter = TokenBucketConfig { rate: 100, burst: 1000 }.into();
    /// assert_eq!(limiter.burst(), 1000);
    /// ```
    fn from(config: TokenBucketConfig) -> Self {
        config.with_clock(Arc::new(SystemClock::new()))
    }
}
