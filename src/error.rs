//! error.rs
//! Error and result types for admission checks and the LRU cache.

use thiserror::Error;

/// Misuse of a limiter. Denying a request is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    /// The tenant was never registered on this limiter (or was removed).
    #[error("tenant '{tenant}' is not configured")]
    TenantNotConfigured { tenant: String },

    /// The limiter has no tenant store, i.e. it was built with `Default`
    /// instead of a constructor.
    #[error("limiter is not initialized: no tenant store")]
    Uninitialized,
}

impl RateLimitError {
    pub(crate) fn tenant_not_configured(tenant: &str) -> Self {
        RateLimitError::TenantNotConfigured {
            tenant: tenant.to_owned(),
        }
    }
}

/// Result of an admission check: `Ok(true)` admits, `Ok(false)` denies.
pub type AdmissionResult = Result<bool, RateLimitError>;

/// Error type for [`LruCache`](crate::lru_cache::LruCache) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A new key was inserted into a full cache. Call `evict` first.
    #[error("cache is full: capacity {capacity}")]
    NoCapacity { capacity: usize },
}
