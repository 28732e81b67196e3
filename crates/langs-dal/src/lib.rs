pub mod error;
pub mod language;
mod loose;

use std::str::FromStr as _;

pub use error::Error;
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Field names of a payload, in declaration order.
pub trait PayloadFields {
    const FIELDS: &'static [&'static str];
}

pub async fn new_pool(database_url: &str, max_connections: u32) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    debug!("Connected to {database_url} with up to {max_connections} connections");
    Ok(pool)
}

/// Creates the `languages` table if it does not exist yet.
pub async fn init_schema(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
