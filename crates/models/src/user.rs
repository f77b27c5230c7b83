use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_WITHDRAWN: &str = "withdrawn";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub cellphone: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE && self.deleted_at.is_none()
    }
}

/// Lowercased, trimmed form under which emails are stored and looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ModelError::Validation("email required".into()));
    }
    if email.len() > 255 || email.chars().any(char::is_whitespace) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

/// Domestic mobile numbers: digits only, 10 or 11 long.
pub fn validate_cellphone(cellphone: &str) -> Result<(), ModelError> {
    let ok = (10..=11).contains(&cellphone.len()) && cellphone.chars().all(|c| c.is_ascii_digit());
    if !ok {
        return Err(ModelError::Validation("cellphone must be 10-11 digits".into()));
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), ModelError> {
    if role != ROLE_USER && role != ROLE_ADMIN {
        return Err(ModelError::Validation(format!("unknown role {role}")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    email: &str,
    cellphone: Option<&str>,
    role: &str,
) -> Result<Model, ModelError> {
    validate_email(email)?;
    if let Some(c) = cellphone {
        validate_cellphone(c)?;
    }
    validate_role(role)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(normalize_email(email)),
        cellphone: Set(cellphone.map(str::to_string)),
        role: Set(role.to_string()),
        status: Set(STATUS_ACTIVE.into()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?;
    Ok(found)
}

async fn load<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<ActiveModel, ModelError> {
    let found = Entity::find_by_id(id).one(db).await?.ok_or(ModelError::NotFound("user"))?;
    Ok(found.into())
}

pub async fn update_cellphone<C: ConnectionTrait>(db: &C, id: Uuid, cellphone: &str) -> Result<Model, ModelError> {
    validate_cellphone(cellphone)?;
    let mut am = load(db, id).await?;
    am.cellphone = Set(Some(cellphone.to_string()));
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn update_role<C: ConnectionTrait>(db: &C, id: Uuid, role: &str) -> Result<Model, ModelError> {
    validate_role(role)?;
    let mut am = load(db, id).await?;
    am.role = Set(role.to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Marks the account withdrawn; the row is kept for order history.
pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Model, ModelError> {
    let mut am = load(db, id).await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    am.status = Set(STATUS_WITHDRAWN.into());
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    Ok(am.update(db).await?)
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("ohjeung@naver.com").is_ok());
        assert!(validate_email("test@test").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@domain").is_err());
        assert!(validate_email("local@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("has space@x.com").is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Foo@Example.COM "), "foo@example.com");
    }

    #[test]
    fn cellphone_validation() {
        assert!(validate_cellphone("01088887777").is_ok());
        assert!(validate_cellphone("0212345678").is_ok());
        assert!(validate_cellphone("010-8888-7777").is_err());
        assert!(validate_cellphone("123").is_err());
        assert!(validate_cellphone("").is_err());
    }

    #[test]
    fn role_validation() {
        assert!(validate_role(ROLE_USER).is_ok());
        assert!(validate_role(ROLE_ADMIN).is_ok());
        assert!(validate_role("ROLE_ROOT").is_err());
    }
}
