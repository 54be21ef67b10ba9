//! Catalog store
//!
//! Owns the full product list, loaded lazily from a JSON document and
//! cached for the rest of the session. Filtering never mutates the
//! catalog; it returns references in load order.

use serde::Deserialize;
use tracing::{debug, info};

use crate::types::Product;
use crate::{LumiereError, Result};

/// On-disk catalog document shape: `{ "products": [...] }`
#[derive(Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

/// The full, authoritative set of browsable products for a session
pub struct CatalogStore {
    path: String,
    products: Option<Vec<Product>>,
}

impl CatalogStore {
    /// Create a store that will load from the given JSON path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            products: None,
        }
    }

    /// Create a store pre-populated with products (tests, embedded data)
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            path: String::new(),
            products: Some(products),
        }
    }

    /// Load the catalog. Idempotent: after the first successful load,
    /// repeated calls return the cached set without touching the file.
    pub async fn load(&mut self) -> Result<&[Product]> {
        if self.products.is_none() {
            let raw = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| LumiereError::catalog(format!("read {}: {}", self.path, e)))?;
            let doc: CatalogDocument = serde_json::from_str(&raw)
                .map_err(|e| LumiereError::catalog(format!("parse {}: {}", self.path, e)))?;
            info!("Loaded {} products from {}", doc.products.len(), self.path);
            self.products = Some(doc.products);
        }
        Ok(self.products.as_deref().unwrap_or_default())
    }

    /// True once a load has succeeded
    pub fn is_loaded(&self) -> bool {
        self.products.is_some()
    }

    /// All loaded products in load order; empty before the first load
    pub fn products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or_default()
    }

    /// Resolve a product by id
    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products().iter().find(|p| p.id == id)
    }

    /// Filter by category membership and case-insensitive substring
    /// search over name, brand, and description. An empty predicate is
    /// the identity on that axis; load order is preserved.
    ///
    /// `categories` accepts comma-joined values ("haircare,hair color")
    /// as produced by multi-category filter controls.
    pub fn filter(&self, categories: &str, search_text: &str) -> Vec<&Product> {
        let wanted: Vec<&str> = categories
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        let needle = search_text.trim().to_lowercase();

        let matches = self
            .products()
            .iter()
            .filter(|p| wanted.is_empty() || wanted.contains(&p.category.as_str()))
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.brand.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect::<Vec<_>>();
        debug!(
            "Filter categories='{}' search='{}' matched {} of {}",
            categories,
            search_text,
            matches.len(),
            self.products().len()
        );
        matches
    }
}
