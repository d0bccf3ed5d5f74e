use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::RateLimitError;
use crate::types::Timestamp;

/// Tenant id to per-tenant state, guarded by a single lock per limiter.
///
/// A detached registry has no backing map. Every access then fails with
/// [`RateLimitError::Uninitialized`], which is how a `Default` limiter behaves.
#[derive(Debug)]
pub(crate) struct TenantRegistry<S> {
    tenants: RwLock<Option<HashMap<String, S>>>,
}

impl<S> TenantRegistry<S> {
    pub(crate) fn new() -> Self {
        TenantRegistry {
            tenants: RwLock::new(Some(HashMap::new())),
        }
    }

    pub(crate) fn detached() -> Self {
        TenantRegistry {
            tenants: RwLock::new(None),
        }
    }

    /// Runs `f` on the whole map under the write lock.
    pub(crate) fn with_store<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, S>) -> R,
    ) -> Result<R, RateLimitError> {
        let mut guard = self.tenants.write();
        let store = guard.as_mut().ok_or(RateLimitError::Uninitialized)?;
        Ok(f(store))
    }

    /// Runs `f` on one tenant's state under the write lock.
    pub(crate) fn with_tenant_mut<R>(
        &self,
        tenant: &str,
        f: impl FnOnce(&mut S) -> R,
    ) -> Result<R, RateLimitError> {
        let mut guard = self.tenants.write();
        let store = guard.as_mut().ok_or(RateLimitError::Uninitialized)?;
        let state = store
            .get_mut(tenant)
            .ok_or_else(|| RateLimitError::tenant_not_configured(tenant))?;
        Ok(f(state))
    }

    /// Runs `f` on one tenant's state under the read lock.
    pub(crate) fn with_tenant<R>(
        &self,
        tenant: &str,
        f: impl FnOnce(&S) -> R,
    ) -> Result<R, RateLimitError> {
        let guard = self.tenants.read();
        let store = guard.as_ref().ok_or(RateLimitError::Uninitialized)?;
        let state = store
            .get(tenant)
            .ok_or_else(|| RateLimitError::tenant_not_configured(tenant))?;
        Ok(f(state))
    }

    pub(crate) fn contains(&self, tenant: &str) -> bool {
        self.tenants
            .read()
            .as_ref()
            .map_or(false, |store| store.contains_key(tenant))
    }

    pub(crate) fn len(&self) -> usize {
        self.tenants.read().as_ref().map_or(0, HashMap::len)
    }

    pub(crate) fn remove(&self, tenant: &str) -> bool {
        self.tenants
            .write()
            .as_mut()
            .map_or(false, |store| store.remove(tenant).is_some())
    }

    /// Removes tenants whose `last_active` is before `cutoff`.
    pub(crate) fn retain_active_since(
        &self,
        cutoff: Timestamp,
        last_active: impl Fn(&S) -> Timestamp,
    ) -> usize {
        let mut guard = self.tenants.write();
        let Some(store) = guard.as_mut() else {
            return 0;
        };
        let before = store.len();
        store.retain(|_, state| last_active(state) >= cutoff);
        before - store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn detached_registry_reports_uninitialized() {
        let registry: TenantRegistry<u32> = TenantRegistry::detached();
        assert_eq!(
            registry.with_store(|_| ()),
            Err(RateLimitError::Uninitialized)
        );
        assert_eq!(
            registry.with_tenant("foo", |_| ()),
            Err(RateLimitError::Uninitialized)
        );
        assert!(!registry.contains("foo"));
        assert_eq!(registry.len(), 0);
        assert!(!registry.remove("foo"));
    }

    #[test]
    fn missing_tenant_is_reported_by_name() {
        let registry: TenantRegistry<u32> = TenantRegistry::new();
        assert_eq!(
            registry.with_tenant_mut("ghost", |_| ()),
            Err(RateLimitError::TenantNotConfigured {
                tenant: "ghost".to_string()
            })
        );
    }

    #[test]
    fn retain_active_since_drops_old_entries() {
        let registry: TenantRegistry<Timestamp> = TenantRegistry::new();
        registry
            .with_store(|store| {
                store.insert("old".into(), Timestamp::from_duration(Duration::from_secs(1)));
                store.insert("new".into(), Timestamp::from_duration(Duration::from_secs(9)));
            })
            .unwrap();
        let cutoff = Timestamp::from_duration(Duration::from_secs(5));
        let removed = registry.retain_active_since(cutoff, |ts| *ts);
        assert_eq!(removed, 1);
        assert!(registry.contains("new"));
        assert!(!registry.contains("old"));
    }
}
