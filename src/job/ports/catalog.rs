//! Product catalog lookup port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog lookups.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog entry referenced by a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Catalog code.
    pub code: String,
    /// Display model name.
    pub model: String,
}

impl Product {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(code: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            model: model.into(),
        }
    }
}

/// Read-only product lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Finds the product with the given code.
    ///
    /// Returns `None` when the code is unknown.
    async fn find_by_code(&self, code: &str) -> CatalogResult<Option<Product>>;
}

/// Errors returned by catalog adapters.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Lookup backend failure.
    #[error("catalog lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogError {
    /// Wraps a lookup error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
