use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{NewProductInput, Product, ProductPage, ProductPatch};
use super::repository::ProductRepository;
use crate::errors::ServiceError;
use crate::pagination::Pagination;

pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    /// Register a product on behalf of an admin.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::product::{ProductService, domain::NewProductInput, repository::mock::InMemoryProductRepository};
    /// let svc = ProductService::new(Arc::new(InMemoryProductRepository::default()));
    /// let input = NewProductInput { product_name: "Tee".into(), product_price: 39000, product_quantity: 10, product_description: None };
    /// let created = tokio_test::block_on(svc.create(input, None)).unwrap();
    /// assert_eq!(created.product_id, 1);
    /// ```
    #[instrument(skip(self, input), fields(name = %input.product_name))]
    pub async fn create(&self, input: NewProductInput, created_by: Option<Uuid>) -> Result<Product, ServiceError> {
        input.validate()?;
        let product = self.repo.insert(input, created_by).await?;
        info!(product_id = product.product_id, "product_created");
        Ok(product)
    }

    pub async fn get(&self, id: i32) -> Result<Product, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product"))
    }

    pub async fn list(&self, opts: Pagination) -> Result<ProductPage, ServiceError> {
        let (page_idx, per_page) = opts.normalize();
        let items = self.repo.list(page_idx, per_page).await?;
        Ok(ProductPage { items, page: page_idx as u32 + 1, per_page: per_page as u32 })
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: ProductPatch) -> Result<Product, ServiceError> {
        let changes: models::product::Changes = patch.clone().into();
        if changes.is_empty() {
            return Err(ServiceError::Validation("nothing to update".into()));
        }
        changes.validate()?;
        let updated = self.repo.update(id, patch).await?.ok_or_else(|| ServiceError::not_found("product"))?;
        info!("product_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("product"));
        }
        info!("product_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::repository::mock::InMemoryProductRepository;

    fn svc() -> ProductService {
        ProductService::new(Arc::new(InMemoryProductRepository::default()))
    }

    fn input(name: &str) -> NewProductInput {
        NewProductInput { product_name: name.into(), product_price: 10_000, product_quantity: 3, product_description: None }
    }

    #[tokio::test]
    async fn create_get_and_validation() {
        let svc = svc();
        let admin = Uuid::new_v4();
        let p = svc.create(input("Cap"), Some(admin)).await.unwrap();
        assert_eq!(p.created_by, Some(admin));
        assert_eq!(svc.get(p.product_id).await.unwrap().product_name, "Cap");
        assert!(matches!(svc.get(999).await, Err(ServiceError::NotFound(_))));

        let bad = NewProductInput { product_price: -1, ..input("Cap") };
        assert!(matches!(svc.create(bad, None).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.create(input("  "), None).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        let svc = svc();
        for i in 0..5 {
            svc.create(input(&format!("item {i}")), None).await.unwrap();
        }
        let page = svc.list(Pagination { page: 2, per_page: 2 }).await.unwrap();
        let ids: Vec<i32> = page.items.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(page.page, 2);
        let last = svc.list(Pagination { page: 3, per_page: 2 }).await.unwrap();
        assert_eq!(last.items.len(), 1);
    }

    #[tokio::test]
    async fn update_rules() {
        let svc = svc();
        let p = svc.create(input("Cap"), None).await.unwrap();
        assert!(matches!(svc.update(p.product_id, ProductPatch::default()).await, Err(ServiceError::Validation(_))));
        let neg = ProductPatch { product_quantity: Some(-2), ..Default::default() };
        assert!(matches!(svc.update(p.product_id, neg).await, Err(ServiceError::Validation(_))));
        let missing = ProductPatch { product_price: Some(1), ..Default::default() };
        assert!(matches!(svc.update(42, missing).await, Err(ServiceError::NotFound(_))));

        let ok = ProductPatch { product_price: Some(5_000), ..Default::default() };
        let updated = svc.update(p.product_id, ok).await.unwrap();
        assert_eq!(updated.product_price, 5_000);
        assert_eq!(updated.product_name, "Cap");
    }

    #[tokio::test]
    async fn update_can_clear_description() {
        let svc = svc();
        let with_desc = NewProductInput { product_description: Some("drop 1".into()), ..input("Cap") };
        let p = svc.create(with_desc, None).await.unwrap();

        let keep = ProductPatch { product_price: Some(1), ..Default::default() };
        assert_eq!(svc.update(p.product_id, keep).await.unwrap().product_description.as_deref(), Some("drop 1"));

        let clear = ProductPatch { product_description: Some(None), ..Default::default() };
        assert!(svc.update(p.product_id, clear).await.unwrap().product_description.is_none());
    }

    #[tokio::test]
    async fn name_length_counts_trimmed_value() {
        let svc = svc();
        let padded = format!("  {}  ", "x".repeat(models::product::NAME_MAX_LEN));
        let p = svc.create(input(&padded), None).await.unwrap();
        assert_eq!(p.product_name.len(), models::product::NAME_MAX_LEN);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let svc = svc();
        let p = svc.create(input("Cap"), None).await.unwrap();
        svc.delete(p.product_id).await.unwrap();
        assert!(matches!(svc.delete(p.product_id).await, Err(ServiceError::NotFound(_))));
    }
}
