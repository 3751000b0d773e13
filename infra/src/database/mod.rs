//! Database connection management.

use std::time::Duration;

use ec_shared::config::DatabaseConfig;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

pub mod mysql;

/// Build the MySQL connection pool.
///
/// The acquire timeout is deliberately short: auth operations must fail
/// fast as a 500 rather than queue behind a saturated pool.
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}
