//! # Coffee Shop DB
//!
//! SQLite pool construction and embedded migrations.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: SQLite connection string (default: `sqlite://database.db?mode=rwc`)
//!
//! # Example
//!
//! ```ignore
//! use coffeeshop_db::{database_url, init_db_pool, MIGRATOR};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sqlx::Error> {
//!     let pool = init_db_pool(&database_url()).await?;
//!     MIGRATOR.run(&pool).await?;
//!     Ok(())
//! }
//! ```

use std::env;
use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

// Re-export SqlitePool for convenience
pub use sqlx::SqlitePool;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://database.db?mode=rwc";

/// Schema migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub fn database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens a connection pool, creating the database file when it is missing.
///
/// This should be called once during startup; the returned pool is cheaply
/// cloneable and lives in the application state.
pub async fn init_db_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    tracing::info!(url = %database_url, "Connecting to database");

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Private in-memory database with migrations applied.
///
/// The pool is pinned to a single connection that never expires, since every
/// SQLite in-memory connection would otherwise see its own empty database.
pub async fn init_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}
