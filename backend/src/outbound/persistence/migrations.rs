//! Embedded schema migrations.
//!
//! Migrations run over a short-lived synchronous connection before the
//! async pool is built; the SQL itself lives under `migrations/` at the
//! crate root.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// All migrations shipped with the crate.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The synchronous connection could not be established.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Migration(String),
}

/// Apply every pending migration, returning how many ran.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Migration(err.to_string()))?;
    Ok(applied.len())
}
