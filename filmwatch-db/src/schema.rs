//! SQLite schema creation and migration.

use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("Unversioned film watch database; bring it in with `import-legacy` instead")]
    LegacyDatabase,
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 2;

/// How long a writer waits on a locked database before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent, safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    let version = get_schema_version(conn)?;
    if version != 0 && version != CURRENT_VERSION {
        migrate(conn, version)?;
    }
    conn.execute_batch(SCHEMA_SQL)?;
    if version == 0 {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a film watch database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    // Leave files from the old plugin untouched.
    if get_schema_version(&conn)? == 0 && table_exists(&conn, "film_actor_watch")? {
        return Err(SchemaError::LegacyDatabase);
    }

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
        [name],
        |row| row.get(0),
    )
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    let mut version = from_version;
    while version < CURRENT_VERSION {
        if version == 1 {
            log::info!("Migrating schema to version 2: adding film_actor_watch.source_url");
            conn.execute_batch("ALTER TABLE film_actor_watch ADD COLUMN source_url TEXT;")?;
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Films, unique on exact title + year
CREATE TABLE IF NOT EXISTS films (
    film_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    year INTEGER NOT NULL,
    UNIQUE(title, year)
);

CREATE TABLE IF NOT EXISTS brands (
    brand_id INTEGER PRIMARY KEY AUTOINCREMENT,
    brand_name TEXT NOT NULL UNIQUE
);

-- A watch belongs to one brand
CREATE TABLE IF NOT EXISTS watches (
    watch_id INTEGER PRIMARY KEY AUTOINCREMENT,
    brand_id INTEGER NOT NULL REFERENCES brands(brand_id),
    model_reference TEXT NOT NULL,
    verification_level TEXT,
    UNIQUE(brand_id, model_reference)
);

CREATE TABLE IF NOT EXISTS actors (
    actor_id INTEGER PRIMARY KEY AUTOINCREMENT,
    actor_name TEXT NOT NULL UNIQUE
);

-- Characters are shared by name, not scoped to a film
CREATE TABLE IF NOT EXISTS characters (
    character_id INTEGER PRIMARY KEY AUTOINCREMENT,
    character_name TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_characters_name ON characters(character_name);

-- One fact per (film, actor)
CREATE TABLE IF NOT EXISTS film_actor_watch (
    faw_id INTEGER PRIMARY KEY AUTOINCREMENT,
    film_id INTEGER NOT NULL REFERENCES films(film_id),
    actor_id INTEGER NOT NULL REFERENCES actors(actor_id),
    character_id INTEGER NOT NULL REFERENCES characters(character_id),
    watch_id INTEGER NOT NULL REFERENCES watches(watch_id),
    narrative_role TEXT,
    source_url TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_faw_film_actor ON film_actor_watch(film_id, actor_id);
CREATE INDEX IF NOT EXISTS idx_faw_watch ON film_actor_watch(watch_id);
CREATE INDEX IF NOT EXISTS idx_faw_character ON film_actor_watch(character_id);
"#;
