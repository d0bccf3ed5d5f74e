//! Per-tenant rate limiting algorithms.
//!
//! Each limiter owns a map from tenant id to that tenant's state, guarded by a
//! single lock per limiter, and reads time from the [`Clock`](crate::clock::Clock)
//! it was built with.
//!
//! - **[`FixedWindowLimiter`]** - Counter reset at window-aligned boundaries
//! - **[`TokenBucketLimiter`]** - Token pool refilled per elapsed second, capped at burst
//!
//! | Algorithm | State per tenant | Registration | Burst Handling |
//! |-----------|------------------|--------------|----------------|
//! | Fixed Window | start, counter, limit | `set_rate_limit` | Up to 2x limit across a boundary |
//! | Token Bucket | tokens, last refill | `setup_token_bucket` | Up to `burst` after idling |
//!
//! Tenants are never created implicitly: checking an unregistered tenant is an
//! error, not an admission.

mod registry;

pub mod fixed_window_limiter;
pub use fixed_window_limiter::FixedWindowConfig;
pub use fixed_window_limiter::FixedWindowLimiter;
pub use fixed_window_limiter::WindowStatus;

pub mod token_bucket_limiter;
pub use token_bucket_limiter::Request;
pub use token_bucket_limiter::TokenBucketConfig;
pub use token_bucket_limiter::TokenBucketLimiter;
