//! Time-bounded cache in front of a product catalog.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::job::ports::{CatalogError, CatalogResult, Product, ProductCatalog};

#[derive(Debug, Clone)]
struct CacheEntry {
    product: Option<Product>,
    fetched_at: DateTime<Utc>,
}

/// Catalog decorator caching lookups (misses included) for a fixed TTL.
///
/// A zero TTL disables caching.
pub struct CachedProductCatalog<P, C>
where
    P: ProductCatalog,
    C: Clock,
{
    inner: Arc<P>,
    clock: Arc<C>,
    ttl: TimeDelta,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<P, C> CachedProductCatalog<P, C>
where
    P: ProductCatalog,
    C: Clock,
{
    /// Wraps `inner`, keeping each lookup for `ttl`.
    #[must_use]
    pub fn new(inner: Arc<P>, clock: Arc<C>, ttl: TimeDelta) -> Self {
        Self {
            inner,
            clock,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drops the cached lookup for one code.
    ///
    /// # Errors
    ///
    /// Returns a lookup error when lock acquisition fails.
    pub fn invalidate(&self, code: &str) -> CatalogResult<()> {
        let mut entries = self.write_entries()?;
        entries.remove(code.trim());
        Ok(())
    }

    /// Drops every cached lookup.
    ///
    /// # Errors
    ///
    /// Returns a lookup error when lock acquisition fails.
    pub fn invalidate_all(&self) -> CatalogResult<()> {
        let mut entries = self.write_entries()?;
        entries.clear();
        Ok(())
    }

    fn cached(&self, code: &str, now: DateTime<Utc>) -> CatalogResult<Option<Option<Product>>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| CatalogError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(entries
            .get(code)
            .filter(|entry| now.signed_duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| entry.product.clone()))
    }

    fn write_entries(
        &self,
    ) -> CatalogResult<std::sync::RwLockWriteGuard<'_, HashMap<String, CacheEntry>>> {
        self.entries
            .write()
            .map_err(|err| CatalogError::lookup(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl<P, C> ProductCatalog for CachedProductCatalog<P, C>
where
    P: ProductCatalog,
    C: Clock + Send + Sync,
{
    async fn find_by_code(&self, code: &str) -> CatalogResult<Option<Product>> {
        let key = code.trim();
        let now = self.clock.utc();
        if let Some(hit) = self.cached(key, now)? {
            tracing::trace!(code = key, "product cache hit");
            return Ok(hit);
        }

        let product = self.inner.find_by_code(key).await?;
        if self.ttl > TimeDelta::zero() {
            let mut entries = self.write_entries()?;
            entries.insert(
                key.to_owned(),
                CacheEntry {
                    product: product.clone(),
                    fetched_at: now,
                },
            );
        }
        Ok(product)
    }
}
