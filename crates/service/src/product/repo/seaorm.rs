use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use models::product;

use crate::errors::ServiceError;
use crate::product::domain::{NewProductInput, Product, ProductPatch};
use crate::product::repository::ProductRepository;

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert(&self, input: NewProductInput, created_by: Option<Uuid>) -> Result<Product, ServiceError> {
        let created = product::create(
            &self.db,
            &input.product_name,
            input.product_price,
            input.product_quantity,
            input.product_description.as_deref(),
            created_by,
        )
        .await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        let found = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(found.map(Product::from))
    }

    async fn list(&self, page_idx: u64, per_page: u64) -> Result<Vec<Product>, ServiceError> {
        let rows = product::list(&self.db, page_idx, per_page).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>, ServiceError> {
        let updated = product::update(&self.db, id, patch.into()).await?;
        Ok(updated.map(Product::from))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(product::delete(&self.db, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seaorm_product_repository_round_trip() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmProductRepository::new(db);

        let input = NewProductInput {
            product_name: "Repo sneakers".into(),
            product_price: 99_000,
            product_quantity: 5,
            product_description: Some("size 270".into()),
        };
        let created = repo.insert(input, None).await?;
        assert_eq!(created.product_name, "Repo sneakers");

        let patch = ProductPatch { product_quantity: Some(4), ..Default::default() };
        let updated = repo.update(created.product_id, patch).await?.expect("row exists");
        assert_eq!(updated.product_quantity, 4);
        assert_eq!(updated.product_price, 99_000);

        assert!(repo.find_by_id(created.product_id).await?.is_some());
        assert!(repo.delete(created.product_id).await?);
        assert!(!repo.delete(created.product_id).await?);
        assert!(repo.update(created.product_id, ProductPatch::default()).await?.is_none());
        Ok(())
    }
}
