//! Database connection pool.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open a connection pool to `url`.
pub async fn connect_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}
