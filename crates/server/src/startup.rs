use std::future::Future;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use tracing::{info, warn};

use configs::AppConfig;
use service::auth::jwt::AuthConfig;
use service::auth::token_store::{InMemoryRefreshTokenStore, RedisRefreshTokenStore, RefreshTokenStore};
use service::product::repo::seaorm::SeaOrmProductRepository;
use service::user::repo::seaorm::SeaOrmUserRepository;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

pub fn auth_config(cfg: &AppConfig) -> AuthConfig {
    AuthConfig {
        access_secret: cfg.jwt.access_secret.clone(),
        refresh_secret: cfg.jwt.refresh_secret.clone(),
        access_ttl_secs: cfg.jwt.access_ttl_secs,
        refresh_ttl_secs: cfg.jwt.refresh_ttl_secs,
    }
}

async fn token_store(cfg: &AppConfig) -> Result<Arc<dyn RefreshTokenStore>, StartupError> {
    if !cfg.redis.is_enabled() {
        warn!("redis.url not set; refresh tokens are kept in process memory and lost on restart");
        return Ok(Arc::new(InMemoryRefreshTokenStore::new()));
    }
    let store = RedisRefreshTokenStore::connect(&cfg.redis.url, &cfg.redis.key_prefix)
        .await
        .map_err(|e| StartupError::TokenStore(e.to_string()))?;
    if !store.ping().await.map_err(|e| StartupError::TokenStore(e.to_string()))? {
        return Err(StartupError::TokenStore("PING did not answer PONG".into()));
    }
    Ok(Arc::new(store))
}

/// Connect database and redis, run migrations and wire the services.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let db = models::db::connect(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    info!("migrations applied");

    let tokens = token_store(cfg).await?;
    Ok(ServerState::new(
        Arc::new(SeaOrmUserRepository::new(db.clone())),
        Arc::new(SeaOrmProductRepository::new(db)),
        tokens,
        auth_config(cfg),
    ))
}

/// Public entry: build the app and serve until `shutdown` resolves
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    info!(%addr, "http server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("http server drained");
    Ok(())
}
