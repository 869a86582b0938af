use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::config::Config;
use crate::error::Result;

pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the process-wide pool and brings the schema up to date. Every
/// service takes a clone of the returned handle.
pub async fn init_db(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("database ready, migrations applied");

    Ok(pool)
}
