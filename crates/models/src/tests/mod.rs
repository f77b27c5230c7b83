
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Connected and migrated database, or `None` when DB tests are disabled.
pub(crate) async fn setup_test_db() -> anyhow::Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Some(db) = crate::db::connect_from_env().await? else {
        eprintln!("DATABASE_URL missing; skipping database tests");
        return Ok(None);
    };
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}
