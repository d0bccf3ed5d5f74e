//! Core trait for per-tenant limiters.
//!
//! This module defines the unified trait implemented by every limiter, so
//! callers can hold a fixed-window or token-bucket limiter behind the same
//! `dyn TenantRateLimit`.

use std::time::Duration;

use crate::AdmissionResult;

/// The core trait implemented by all per-tenant limiters.
pub trait TenantRateLimit: Send + Sync {
    /// Decides whether one unit of work for `tenant` may proceed now.
    ///
    /// # Returns
    /// * `Ok(true)` if the request is admitted
    /// * `Ok(false)` if the tenant is over its limit
    /// * `Err(RateLimitError)` if the tenant is unknown or the limiter has no store
    fn allow(&self, tenant: &str) -> AdmissionResult;

    /// Returns `true` if `tenant` has state on this limiter.
    fn contains_tenant(&self, tenant: &str) -> bool;

    /// Number of registered tenants (zero for an uninitialized limiter).
    fn tenant_count(&self) -> usize;

    /// Drops the state for `tenant`. Returns `true` if it existed.
    ///
    /// Later admission checks for the tenant fail until it is registered again.
    fn remove_tenant(&self, tenant: &str) -> bool;

    /// Drops every tenant whose last recorded activity is older than
    /// `max_idle` before now, returning how many were removed.
    fn evict_idle(&self, max_idle: Duration) -> usize;

    /// Fail-closed shortcut: any error counts as a denial.
    fn allow_or_deny(&self, tenant: &str) -> bool {
        self.allow(tenant).unwrap_or(false)
    }
}
