use std::sync::Arc;

use service::auth::jwt::AuthConfig;
use service::auth::token_store::{InMemoryRefreshTokenStore, RefreshTokenStore};
use service::auth::AuthService;
use service::product::repository::{mock::InMemoryProductRepository, ProductRepository};
use service::product::ProductService;
use service::user::repository::{mock::InMemoryUserRepository, UserRepository};
use service::user::UserService;

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
}

impl ServerState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        tokens: Arc<dyn RefreshTokenStore>,
        cfg: AuthConfig,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users.clone(), tokens.clone(), cfg)),
            users: Arc::new(UserService::new(users, tokens)),
            products: Arc::new(ProductService::new(products)),
        }
    }

    /// Fully in-process state, no database or redis.
    pub fn in_memory(cfg: AuthConfig) -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(InMemoryProductRepository::default()),
            Arc::new(InMemoryRefreshTokenStore::new()),
            cfg,
        )
    }
}
