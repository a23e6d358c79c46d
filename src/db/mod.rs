pub mod queries;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use queries::categories::Category;
pub use queries::questions::Question;

use sqlx::Error;

use crate::settings::DatabaseSettings;

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, Error> {
    let options =
        SqliteConnectOptions::from_str(&format!("sqlite:{}", settings.path))?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

/// A private in-memory database, living as long as the returned pool.
///
/// The pool holds a single connection that never expires: every new sqlite
/// connection to `:memory:` would open a fresh, empty database.
pub async fn establish_in_memory_connection() -> Result<SqlitePool, Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
