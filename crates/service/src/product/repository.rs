use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewProductInput, Product, ProductPatch};
use crate::errors::ServiceError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, input: NewProductInput, created_by: Option<Uuid>) -> Result<Product, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError>;
    /// Ordered by id; `page_idx` is 0-based.
    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<Product>, ServiceError>;
    /// `Ok(None)` when the id does not exist.
    async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryProductRepository {
        rows: RwLock<(i32, BTreeMap<i32, Product>)>,
    }

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn insert(&self, input: NewProductInput, created_by: Option<Uuid>) -> Result<Product, ServiceError> {
            let mut guard = self.rows.write().await;
            let (seq, rows) = &mut *guard;
            *seq += 1;
            let now = Utc::now();
            let product = Product {
                product_id: *seq,
                product_name: input.product_name.trim().to_string(),
                product_price: input.product_price,
                product_quantity: input.product_quantity,
                product_description: input.product_description,
                created_by,
                created_at: now,
                updated_at: now,
            };
            rows.insert(product.product_id, product.clone());
            Ok(product)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
            Ok(self.rows.read().await.1.get(&id).cloned())
        }

        async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<Product>, ServiceError> {
            let guard = self.rows.read().await;
            let skip = usize::try_from(page_idx * per_page).unwrap_or(usize::MAX);
            let take = usize::try_from(per_page).unwrap_or(usize::MAX);
            Ok(guard.1.values().skip(skip).take(take).cloned().collect())
        }

        async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>, ServiceError> {
            let mut guard = self.rows.write().await;
            let Some(p) = guard.1.get_mut(&id) else { return Ok(None) };
            if let Some(name) = patch.product_name {
                p.product_name = name.trim().to_string();
            }
            if let Some(price) = patch.product_price {
                p.product_price = price;
            }
            if let Some(quantity) = patch.product_quantity {
                p.product_quantity = quantity;
            }
            if let Some(description) = patch.product_description {
                p.product_description = description;
            }
            p.updated_at = Utc::now();
            Ok(Some(p.clone()))
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.rows.write().await.1.remove(&id).is_some())
        }
    }
}
