//! Selection store
//!
//! The user-curated, ordered subset of the catalog. Uniqueness is by
//! product id and insertion order is display order. Every mutation is
//! persisted before it returns; hydration validates persisted snapshots
//! against the live catalog and drops entries that no longer resolve.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::CatalogStore;
use crate::storage::{KeyValueStorage, KEY_SELECTED_PRODUCTS};
use crate::types::Product;
use crate::Result;

/// Ordered, id-unique subset of catalog products
pub struct SelectionStore {
    storage: Arc<dyn KeyValueStorage>,
    selected: Vec<Product>,
}

impl SelectionStore {
    /// Create an empty selection backed by the given storage
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            selected: Vec::new(),
        }
    }

    /// Restore the persisted selection, dropping snapshots whose id no
    /// longer resolves in the catalog. A corrupted value is discarded
    /// and its key cleared rather than treated as fatal.
    pub async fn hydrate(&mut self, catalog: &CatalogStore) -> Result<()> {
        let Some(raw) = self.storage.get(KEY_SELECTED_PRODUCTS).await? else {
            return Ok(());
        };
        let snapshots: Vec<Product> = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Discarding corrupt persisted selection: {}", e);
                self.storage.remove(KEY_SELECTED_PRODUCTS).await?;
                return Ok(());
            }
        };
        let before = snapshots.len();
        self.selected = snapshots
            .into_iter()
            .filter(|p| catalog.get(p.id).is_some())
            .collect();
        if self.selected.len() != before {
            debug!(
                "Dropped {} stale selection entries during hydration",
                before - self.selected.len()
            );
            self.persist().await?;
        }
        Ok(())
    }

    /// Toggle a product in or out of the selection. An id that does not
    /// resolve in the catalog is a no-op, not an error.
    pub async fn toggle(&mut self, product_id: u32, catalog: &CatalogStore) -> Result<()> {
        if let Some(pos) = self.selected.iter().position(|p| p.id == product_id) {
            self.selected.remove(pos);
        } else if let Some(product) = catalog.get(product_id) {
            self.selected.push(product.clone());
        } else {
            debug!("Toggle ignored for unknown product id {}", product_id);
            return Ok(());
        }
        self.persist().await
    }

    /// Remove a product from the selection
    pub async fn remove(&mut self, product_id: u32) -> Result<()> {
        self.selected.retain(|p| p.id != product_id);
        self.persist().await
    }

    /// Drop every selected product
    pub async fn clear(&mut self) -> Result<()> {
        self.selected.clear();
        self.persist().await
    }

    /// Membership query driving highlight state
    pub fn contains(&self, product_id: u32) -> bool {
        self.selected.iter().any(|p| p.id == product_id)
    }

    /// Selected products in insertion order
    pub fn products(&self) -> &[Product] {
        &self.selected
    }

    /// Number of selected products
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True when nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    async fn persist(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.selected)?;
        self.storage.put(KEY_SELECTED_PRODUCTS, &serialized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn catalog() -> CatalogStore {
        CatalogStore::with_products(vec![
            Product {
                id: 1,
                name: "Revitalift Serum".into(),
                brand: "L'Oréal Paris".into(),
                category: "skincare".into(),
                description: "Anti-aging serum.".into(),
                image: "revitalift.jpg".into(),
            },
            Product {
                id: 2,
                name: "Elvive Shampoo".into(),
                brand: "L'Oréal Paris".into(),
                category: "haircare".into(),
                description: "Repairing shampoo.".into(),
                image: "elvive.jpg".into(),
            },
        ])
    }

    #[tokio::test]
    async fn toggle_parity_controls_membership() {
        let catalog = catalog();
        let mut sel = SelectionStore::new(Arc::new(MemoryStorage::new()));

        sel.toggle(1, &catalog).await.unwrap();
        assert!(sel.contains(1));
        sel.toggle(1, &catalog).await.unwrap();
        assert!(!sel.contains(1));
        sel.toggle(1, &catalog).await.unwrap();
        assert!(sel.contains(1));
    }

    #[tokio::test]
    async fn unknown_id_is_a_noop() {
        let catalog = catalog();
        let mut sel = SelectionStore::new(Arc::new(MemoryStorage::new()));
        sel.toggle(99, &catalog).await.unwrap();
        assert!(sel.is_empty());
    }

    #[tokio::test]
    async fn insertion_order_is_preserved() {
        let catalog = catalog();
        let mut sel = SelectionStore::new(Arc::new(MemoryStorage::new()));
        sel.toggle(2, &catalog).await.unwrap();
        sel.toggle(1, &catalog).await.unwrap();
        let ids: Vec<u32> = sel.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn persists_and_rehydrates_in_order() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = catalog();
        {
            let mut sel = SelectionStore::new(storage.clone());
            sel.toggle(2, &catalog).await.unwrap();
            sel.toggle(1, &catalog).await.unwrap();
        }
        let mut restored = SelectionStore::new(storage);
        restored.hydrate(&catalog).await.unwrap();
        let ids: Vec<u32> = restored.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn hydration_drops_ids_missing_from_catalog() {
        let storage = Arc::new(MemoryStorage::new());
        let stale = Product {
            id: 42,
            name: "Discontinued".into(),
            brand: "Old".into(),
            category: "makeup".into(),
            description: "Gone.".into(),
            image: "gone.jpg".into(),
        };
        storage.seed(
            KEY_SELECTED_PRODUCTS,
            &serde_json::to_string(&vec![stale]).unwrap(),
        );
        let mut sel = SelectionStore::new(storage);
        sel.hydrate(&catalog()).await.unwrap();
        assert!(sel.is_empty());
    }

    #[tokio::test]
    async fn corrupt_persisted_selection_is_cleared() {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed(KEY_SELECTED_PRODUCTS, "{not json");
        let mut sel = SelectionStore::new(storage.clone());
        sel.hydrate(&catalog()).await.unwrap();
        assert!(sel.is_empty());
        assert_eq!(storage.get(KEY_SELECTED_PRODUCTS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_empties_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = catalog();
        let mut sel = SelectionStore::new(storage.clone());
        sel.toggle(1, &catalog).await.unwrap();
        sel.clear().await.unwrap();
        assert!(sel.is_empty());
        assert_eq!(
            storage.get(KEY_SELECTED_PRODUCTS).await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
