use std::{env, time::Duration};

use configs::DatabaseConfig;
use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// `DATABASE_URL` from the environment (or `.env`), if any.
pub static DATABASE_URL: Lazy<Option<String>> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
});

/// Open a pooled connection using the `[database]` section of the config.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    info!(
        max_connections = cfg.max_connections,
        min_connections = cfg.min_connections,
        "database pool ready"
    );
    Ok(db)
}

/// Connect with default pool settings to `DATABASE_URL`; `None` when unset.
pub async fn connect_from_env() -> Result<Option<DatabaseConnection>, DbErr> {
    let Some(url) = DATABASE_URL.clone() else {
        return Ok(None);
    };
    let cfg = DatabaseConfig { url, ..DatabaseConfig::default() };
    connect(&cfg).await.map(Some)
}
