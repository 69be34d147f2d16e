/// Database migration runner
///
/// Applies the SQL migrations embedded from this crate's `migrations/`
/// directory. Run once at startup, before the server accepts requests.

use sqlx::PgPool;
use tracing::info;

/// Runs all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply; already-applied
/// migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("database migrations complete");

    Ok(())
}
