use anyhow::{Context, Result};
use log::info;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::data::migration::MigrationManager;
use crate::data::repositories::SqliteArticleRepository;
use crate::utils;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the SQLite connection pool and hands out repositories over it
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens (creating if needed) the database file and brings the schema up to date
    pub fn open(db_path: &Path, pool_size: u32) -> Result<Self> {
        utils::ensure_directory_exists(db_path)?;
        let pool = init_database(db_path, pool_size)?;
        info!(
            "Connected to the database at {} (pool size {})",
            db_path.display(),
            pool_size
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> Pool<SqliteConnectionManager> {
        self.pool.clone()
    }

    pub fn article_repository(&self) -> Arc<SqliteArticleRepository> {
        Arc::new(SqliteArticleRepository::new(self.pool.clone()))
    }
}

pub fn init_database(db_path: &Path, pool_size: u32) -> Result<Pool<SqliteConnectionManager>> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
        .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));

    let pool = Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let conn = pool.get().context("Failed to check out a database connection")?;
    MigrationManager::new(&conn).run_migrations()?;

    Ok(pool)
}
