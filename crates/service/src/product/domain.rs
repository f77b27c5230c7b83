use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use models::product;

/// Product as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i32,
    pub product_name: String,
    pub product_price: i64,
    pub product_quantity: i32,
    pub product_description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product::Model> for Product {
    fn from(m: product::Model) -> Self {
        Product {
            product_id: m.id,
            product_name: m.name,
            product_price: m.price,
            product_quantity: m.quantity,
            product_description: m.description,
            created_by: m.created_by,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// `POST /product`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductInput {
    pub product_name: String,
    pub product_price: i64,
    pub product_quantity: i32,
    #[serde(default)]
    pub product_description: Option<String>,
}

impl NewProductInput {
    pub fn validate(&self) -> Result<(), models::errors::ModelError> {
        product::validate_name(&self.product_name)?;
        product::validate_price(self.product_price)?;
        product::validate_quantity(self.product_quantity)
    }
}

/// `PATCH /product/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub product_price: Option<i64>,
    pub product_quantity: Option<i32>,
    /// `null` clears the description.
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub product_description: Option<Option<String>>,
}

/// Wraps any present value, `null` included, so it differs from an absent field.
fn present<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(de).map(Some)
}

impl From<ProductPatch> for product::Changes {
    fn from(p: ProductPatch) -> Self {
        product::Changes {
            name: p.product_name,
            price: p.product_price,
            quantity: p.product_quantity,
            description: p.product_description,
        }
    }
}

/// One page of the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
}
