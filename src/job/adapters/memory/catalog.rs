//! In-memory product catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::job::ports::{CatalogResult, Product, ProductCatalog};

/// Product catalog over a fixed set of entries.
///
/// Counts lookups so callers can observe cache behaviour.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    products: Arc<HashMap<String, Product>>,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryProductCatalog {
    /// Creates a catalog from its entries. Later entries win on duplicate
    /// codes.
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let by_code = products
            .into_iter()
            .map(|product| (product.code.clone(), product))
            .collect();
        Self {
            products: Arc::new(by_code),
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns how many lookups reached this catalog.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn find_by_code(&self, code: &str) -> CatalogResult<Option<Product>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.products.get(code.trim()).cloned())
    }
}
