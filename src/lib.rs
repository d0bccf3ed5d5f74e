//! Per-tenant admission control.
//!
//! This library decides, for a tenant id and the current time, whether one
//! unit of work may proceed. Every tenant has its own independent state, and
//! every limiter reads time through an injected [`Clock`](clock::Clock), so the
//! same code runs against wall-clock time in production and against a manually
//! advanced clock in tests.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tenant_guard::clock::SystemClock;
//! use tenant_guard::limiters::TokenBucketLimiter;
//!
//! // 100 tokens per second, at most 1000 stored per tenant
//! let limiter = TokenBucketLimiter::new(100, 1000, Arc::new(SystemClock::new()));
//! limiter.setup_token_bucket("tenant-a").unwrap();
//!
//! match limiter.allow("tenant-a") {
//!     Ok(true) => println!("Request allowed"),
//!     Ok(false) => println!("Request denied"),
//!     Err(e) => println!("Misconfigured: {}", e),
//! }
//! ```
//!
//! # Available Limiters
//!
//! ## [Fixed Window](limiters::FixedWindowLimiter)
//! A counter per tenant, reset at window-aligned boundaries:
//! ```rust
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # use tenant_guard::clock::SimulatedClock;
//! # use tenant_guard::limiters::FixedWindowLimiter;
//! let limiter = FixedWindowLimiter::new(Duration::from_secs(60), Arc::new(SimulatedClock::new()));
//! limiter.set_rate_limit("tenant-a", 600).unwrap(); // 600 requests per minute
//! ```
//!
//! ## [Token Bucket](limiters::TokenBucketLimiter)
//! A token pool per tenant, refilled every whole second up to a burst ceiling:
//! ```rust
//! # use std::sync::Arc;
//! # use tenant_guard::clock::SimulatedClock;
//! # use tenant_guard::limiters::TokenBucketLimiter;
//! let limiter = TokenBucketLimiter::new(10, 50, Arc::new(SimulatedClock::new()));
//! limiter.setup_token_bucket("tenant-a").unwrap();
//! ```
//!
//! # Core Concepts
//!
//! ## Time
//! Limiters never call host time functions. [`SystemClock`](clock::SystemClock)
//! maps onto the host; [`SimulatedClock`](clock::SimulatedClock) only moves
//! when `advance` is called and fires due timers as it goes.
//!
//! ## Error Handling
//! Admission checks return [`AdmissionResult`]:
//! - **`Ok(true)`** - Request admitted
//! - **`Ok(false)`** - Rate limit reached; this is a normal outcome
//! - **[`TenantNotConfigured`](RateLimitError::TenantNotConfigured)** - Unknown tenant
//! - **[`Uninitialized`](RateLimitError::Uninitialized)** - Limiter built without a tenant store
//!
//! Unknown tenants are never provisioned implicitly.
//!
//! ## Thread Safety
//! Each limiter guards its tenant map with one `parking_lot::RwLock`. Checks
//! take the write lock, status queries the read lock. The clock is always read
//! before the limiter lock is taken.
//!
//! ## Tenant Lifetime
//! Tenant state lives until the limiter is dropped or the tenant is removed with
//! [`remove_tenant`](rate_limit::TenantRateLimit::remove_tenant) or
//! [`evict_idle`](rate_limit::TenantRateLimit::evict_idle).

pub mod clock;
pub mod error;
pub mod limiters;
pub mod lru_cache;
pub mod rate_limit;
pub mod types;

pub use error::{AdmissionResult, CacheError, RateLimitError};
pub use rate_limit::TenantRateLimit;
pub use types::{Timestamp, Uint};
