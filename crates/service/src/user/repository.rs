use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Credentials, NewUser, Role, UserAccount};
use crate::errors::ServiceError;

/// Repository abstraction for account persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lookup by normalized email; withdrawn accounts are returned too.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, ServiceError>;
    /// Inserts the user and its credentials atomically. Duplicate email is `Conflict`.
    async fn create(&self, new_user: NewUser) -> Result<UserAccount, ServiceError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError>;

    async fn update_cellphone(&self, id: Uuid, cellphone: &str) -> Result<UserAccount, ServiceError>;
    async fn update_role(&self, id: Uuid, role: Role) -> Result<UserAccount, ServiceError>;
    async fn withdraw(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::user::domain::UserStatus;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: RwLock<HashMap<Uuid, UserAccount>>,
        creds: RwLock<HashMap<Uuid, Credentials>>,
    }

    impl InMemoryUserRepository {
        async fn modify(&self, id: Uuid, f: impl FnOnce(&mut UserAccount)) -> Result<UserAccount, ServiceError> {
            let mut users = self.users.write().await;
            let user = users.get_mut(&id).ok_or_else(|| ServiceError::not_found("user"))?;
            f(user);
            Ok(user.clone())
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ServiceError> {
            let users = self.users.read().await;
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, ServiceError> {
            Ok(self.users.read().await.get(&id).cloned())
        }

        async fn create(&self, new_user: NewUser) -> Result<UserAccount, ServiceError> {
            let mut users = self.users.write().await;
            if users.values().any(|u| u.email == new_user.email) {
                return Err(ServiceError::Conflict("email already registered".into()));
            }
            let user = UserAccount {
                id: Uuid::new_v4(),
                email: new_user.email,
                cellphone: new_user.cellphone,
                role: new_user.role,
                status: UserStatus::Active,
                created_at: Utc::now(),
            };
            users.insert(user.id, user.clone());
            self.creds.write().await.insert(
                user.id,
                Credentials {
                    user_id: user.id,
                    password_hash: new_user.password_hash,
                    password_algorithm: new_user.password_algorithm,
                },
            );
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError> {
            Ok(self.creds.read().await.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError> {
            let c = Credentials { user_id, password_hash, password_algorithm: password_algorithm.to_string() };
            self.creds.write().await.insert(user_id, c);
            Ok(())
        }

        async fn update_cellphone(&self, id: Uuid, cellphone: &str) -> Result<UserAccount, ServiceError> {
            self.modify(id, |u| u.cellphone = Some(cellphone.to_string())).await
        }

        async fn update_role(&self, id: Uuid, role: Role) -> Result<UserAccount, ServiceError> {
            self.modify(id, |u| u.role = role).await
        }

        async fn withdraw(&self, id: Uuid) -> Result<(), ServiceError> {
            self.modify(id, |u| u.status = UserStatus::Withdrawn).await?;
            Ok(())
        }
    }
}
