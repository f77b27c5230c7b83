use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use uuid::Uuid;

use models::errors::ModelError;
use models::{user, user_credentials};

use crate::errors::ServiceError;
use crate::user::domain::{Credentials, NewUser, Role, UserAccount};
use crate::user::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ServiceError> {
        user::find_by_email(&self.db, email).await?.map(UserAccount::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, ServiceError> {
        let found = user::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        found.map(UserAccount::try_from).transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<UserAccount, ServiceError> {
        if user::find_by_email(&self.db, &new_user.email).await?.is_some() {
            return Err(ServiceError::Conflict("email already registered".into()));
        }
        let txn = self.db.begin().await.map_err(db_err)?;
        let created = user::create(&txn, &new_user.email, new_user.cellphone.as_deref(), new_user.role.as_str()).await;
        let created = match created {
            Ok(m) => m,
            // lost a race against a concurrent sign-up on the unique index
            Err(ModelError::Db(msg)) if msg.contains("duplicate key") => {
                return Err(ServiceError::Conflict("email already registered".into()))
            }
            Err(e) => return Err(e.into()),
        };
        user_credentials::upsert_password(&txn, created.id, new_user.password_hash, &new_user.password_algorithm).await?;
        txn.commit().await.map_err(db_err)?;
        UserAccount::try_from(created)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError> {
        let found = user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(found.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError> {
        user_credentials::upsert_password(&self.db, user_id, password_hash, password_algorithm).await?;
        Ok(())
    }

    async fn update_cellphone(&self, id: Uuid, cellphone: &str) -> Result<UserAccount, ServiceError> {
        let updated = user::update_cellphone(&self.db, id, cellphone).await?;
        UserAccount::try_from(updated)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<UserAccount, ServiceError> {
        let updated = user::update_role(&self.db, id, role.as_str()).await?;
        UserAccount::try_from(updated)
    }

    async fn withdraw(&self, id: Uuid) -> Result<(), ServiceError> {
        user::soft_delete(&self.db, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::user::domain::UserStatus;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            cellphone: Some("01088887777".into()),
            role: Role::User,
            password_hash: "$argon2id$placeholder".into(),
            password_algorithm: "argon2".into(),
        }
    }

    #[tokio::test]
    async fn seaorm_user_repository_round_trip() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmUserRepository::new(db.clone());

        let email = format!("repo_{}@example.com", Uuid::new_v4());
        let created = repo.create(new_user(&email)).await?;
        assert_eq!(created.role, Role::User);

        let dup = repo.create(new_user(&email)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let creds = repo.get_credentials(created.id).await?.expect("credentials stored with user");
        assert_eq!(creds.password_algorithm, "argon2");

        let admin = repo.update_role(created.id, Role::Admin).await?;
        assert_eq!(admin.role, Role::Admin);

        repo.withdraw(created.id).await?;
        let after = repo.find_by_email(&email).await?.expect("withdrawn row kept");
        assert_eq!(after.status, UserStatus::Withdrawn);

        user::hard_delete(&db, created.id).await?;
        Ok(())
    }
}
