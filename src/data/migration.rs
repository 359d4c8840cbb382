use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

const CREATE_ARTICLES_TABLE: &str = "CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    date TEXT NOT NULL,
    body TEXT NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]'
)";

const CREATE_ARTICLES_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_articles_date ON articles (date)";

/// Ordered list of schema migrations. Append only.
const MIGRATIONS: &[(&str, &str)] = &[
    ("create_articles_table", CREATE_ARTICLES_TABLE),
    ("add_articles_date_index", CREATE_ARTICLES_DATE_INDEX),
];

/// Database migration manager that handles schema updates
pub struct MigrationManager<'a> {
    connection: &'a Connection,
}

impl<'a> MigrationManager<'a> {
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }

    /// Run all pending migrations in order
    pub fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        self.create_migrations_table()?;
        for (name, sql) in MIGRATIONS {
            self.apply(name, sql)?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Names of the migrations recorded as applied, oldest first
    pub fn applied_migrations(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare("SELECT name FROM migrations ORDER BY id")
            .context("Failed to prepare applied migrations query")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("Failed to read applied migrations")?;
        Ok(names)
    }

    fn create_migrations_table(&self) -> Result<()> {
        debug!("Creating migrations table if it doesn't exist");

        self.connection
            .execute(
                "CREATE TABLE IF NOT EXISTS migrations (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    applied_at TEXT NOT NULL
                )",
                [],
            )
            .context("Failed to create migrations table")?;

        Ok(())
    }

    fn is_migration_applied(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("Failed to check if migration has been applied")?;

        Ok(count > 0)
    }

    fn record_migration(&self, name: &str) -> Result<()> {
        debug!("Recording migration '{}' as applied", name);

        self.connection
            .execute(
                "INSERT INTO migrations (name, applied_at) VALUES (?1, datetime('now'))",
                [name],
            )
            .context("Failed to record migration")?;

        Ok(())
    }

    fn apply(&self, name: &str, sql: &str) -> Result<()> {
        if self.is_migration_applied(name)? {
            debug!("Migration '{}' already recorded as applied, skipping", name);
            return Ok(());
        }

        info!("Running migration: {}", name);
        self.connection
            .execute_batch(sql)
            .with_context(|| format!("Failed to run migration '{}'", name))?;
        self.record_migration(name)
    }
}
