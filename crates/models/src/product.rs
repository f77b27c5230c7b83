use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

pub const NAME_MAX_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Creator }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Creator => Entity::belongs_to(user::Entity)
                .from(Column::CreatedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Checked on the trimmed value, which is what gets stored.
pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ModelError::Validation("product name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("product name longer than {NAME_MAX_LEN} chars")));
    }
    Ok(())
}

pub fn validate_price(price: i64) -> Result<(), ModelError> {
    if price < 0 {
        return Err(ModelError::Validation("price must be >= 0".into()));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), ModelError> {
    if quantity < 0 {
        return Err(ModelError::Validation("quantity must be >= 0".into()));
    }
    Ok(())
}

/// Partial update; `None` leaves the column untouched, `Some(None)` nulls `description`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changes {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub quantity: Option<i32>,
    pub description: Option<Option<String>>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    price: i64,
    quantity: i32,
    description: Option<&str>,
    created_by: Option<Uuid>,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_price(price)?;
    validate_quantity(quantity)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        name: Set(name.trim().to_string()),
        price: Set(price),
        quantity: Set(quantity),
        description: Set(description.map(str::to_string)),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn list<C: ConnectionTrait>(db: &C, page_idx: u64, per_page: u64) -> Result<Vec<Model>, ModelError> {
    let items = Entity::find()
        .order_by_asc(Column::Id)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;
    Ok(items)
}

/// Returns `Ok(None)` when no product has this id.
pub async fn update<C: ConnectionTrait>(db: &C, id: i32, changes: Changes) -> Result<Option<Model>, ModelError> {
    changes.validate()?;
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    if let Some(name) = changes.name {
        am.name = Set(name.trim().to_string());
    }
    if let Some(price) = changes.price {
        am.price = Set(price);
    }
    if let Some(quantity) = changes.quantity {
        am.quantity = Set(quantity);
    }
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
