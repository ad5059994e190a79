use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use tracing::info;

/// Applies the embedded schema in `migrations/`.
pub async fn run_migrations(db: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(db).await?;
    info!("Database schema is up to date");
    Ok(())
}
