//! Row-level operations for the film watch tables.
//!
//! Each dimension (film, brand, watch, actor, character) has an upsert that
//! reuses an existing row when its natural key matches and creates one
//! otherwise. These functions do not open transactions; the repository and
//! maintenance layers wrap them.

use filmwatch_catalog::types::*;
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Cannot delete {entity_type} '{id}': {count} watches are using it")]
    InUse {
        entity_type: String,
        id: String,
        count: i64,
    },
    #[error("A fact already exists for film {film_id} and actor {actor_id}")]
    UniqueViolation { film_id: i64, actor_id: i64 },
}

impl OperationError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

/// Column values for a new `film_actor_watch` row.
#[derive(Debug, Clone)]
pub struct NewFact<'a> {
    pub film_id: i64,
    pub actor_id: i64,
    pub character_id: i64,
    pub watch_id: i64,
    pub narrative: &'a str,
    pub source_url: Option<&'a str>,
}

// ── Film Operations ─────────────────────────────────────────────────────────

/// Find a film by exact title and year, creating it if absent.
pub fn upsert_film(conn: &Connection, title: &str, year: i32) -> Result<i64, OperationError> {
    let existing = conn
        .query_row(
            "SELECT film_id FROM films WHERE title = ?1 AND year = ?2",
            params![title, year],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    if let Some(id) = existing {
        log::debug!("Reusing film {} ({}) as #{}", title, year, id);
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO films (title, year) VALUES (?1, ?2)",
        params![title, year],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("Created film {} ({}) as #{}", title, year, id);
    Ok(id)
}

// ── Brand Operations ────────────────────────────────────────────────────────

/// Find a brand by exact name, creating it if absent.
pub fn upsert_brand(conn: &Connection, name: &str) -> Result<i64, OperationError> {
    if let Some(id) = find_brand_by_name(conn, name)? {
        return Ok(id);
    }
    conn.execute("INSERT INTO brands (brand_name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    log::debug!("Created brand '{}' as #{}", name, id);
    Ok(id)
}

pub fn find_brand_by_name(conn: &Connection, name: &str) -> Result<Option<i64>, OperationError> {
    let mut stmt = conn.prepare("SELECT brand_id FROM brands WHERE brand_name = ?1")?;
    let result = stmt.query_row(params![name], |row| row.get::<_, i64>(0));
    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Watch Operations ────────────────────────────────────────────────────────

/// Find a watch by (brand, model), creating it if absent.
///
/// `verification` is only written when the watch is created; an existing
/// watch keeps whatever level it already has.
pub fn upsert_watch(
    conn: &Connection,
    brand_id: i64,
    model_reference: &str,
    verification: VerificationLevel,
) -> Result<i64, OperationError> {
    if let Some(id) = find_watch(conn, brand_id, model_reference)? {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO watches (brand_id, model_reference, verification_level)
         VALUES (?1, ?2, ?3)",
        params![brand_id, model_reference, verification.as_str()],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!(
        "Created watch '{}' for brand #{} as #{}",
        model_reference,
        brand_id,
        id
    );
    Ok(id)
}

pub fn find_watch(
    conn: &Connection,
    brand_id: i64,
    model_reference: &str,
) -> Result<Option<i64>, OperationError> {
    conn.query_row(
        "SELECT watch_id FROM watches WHERE brand_id = ?1 AND model_reference = ?2",
        params![brand_id, model_reference],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

// ── Actor Operations ────────────────────────────────────────────────────────

/// Find an actor by exact name, creating it if absent.
pub fn upsert_actor(conn: &Connection, name: &str) -> Result<i64, OperationError> {
    let existing = conn
        .query_row(
            "SELECT actor_id FROM actors WHERE actor_name = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute("INSERT INTO actors (actor_name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    log::debug!("Created actor '{}' as #{}", name, id);
    Ok(id)
}

// ── Character Operations ────────────────────────────────────────────────────

/// Find a character by name, creating it if absent.
///
/// Names are not unique. When several rows share the name, the oldest one is
/// reused regardless of film or actor.
pub fn upsert_character(conn: &Connection, name: &str) -> Result<i64, OperationError> {
    let existing = conn
        .query_row(
            "SELECT character_id FROM characters WHERE character_name = ?1
             ORDER BY character_id LIMIT 1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO characters (character_name) VALUES (?1)",
        params![name],
    )?;
    let id = conn.last_insert_rowid();
    log::debug!("Created character '{}' as #{}", name, id);
    Ok(id)
}

// ── Fact Operations ─────────────────────────────────────────────────────────

/// The id of the fact recorded for (film, actor), if any.
pub fn find_fact_for(
    conn: &Connection,
    film_id: i64,
    actor_id: i64,
) -> Result<Option<i64>, OperationError> {
    conn.query_row(
        "SELECT faw_id FROM film_actor_watch WHERE film_id = ?1 AND actor_id = ?2",
        params![film_id, actor_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Insert a fact row. Returns the generated ID.
///
/// A collision on the (film, actor) unique index is reported as
/// [`OperationError::UniqueViolation`]; every other failure, including other
/// constraint failures, stays [`OperationError::Sqlite`].
pub fn insert_fact_row(conn: &Connection, fact: &NewFact<'_>) -> Result<i64, OperationError> {
    let result = conn.execute(
        "INSERT INTO film_actor_watch (film_id, actor_id, character_id, watch_id,
             narrative_role, source_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            fact.film_id,
            fact.actor_id,
            fact.character_id,
            fact.watch_id,
            fact.narrative,
            fact.source_url,
        ],
    );
    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(OperationError::UniqueViolation {
            film_id: fact.film_id,
            actor_id: fact.actor_id,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Point a fact at a new character and watch and replace its narrative.
///
/// `source_url` is only written when `Some`.
pub fn update_fact_row(
    conn: &Connection,
    fact_id: i64,
    character_id: i64,
    watch_id: i64,
    narrative: &str,
    source_url: Option<&str>,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE film_actor_watch
         SET character_id = ?2, watch_id = ?3, narrative_role = ?4,
             source_url = COALESCE(?5, source_url)
         WHERE faw_id = ?1",
        params![fact_id, character_id, watch_id, narrative, source_url],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found("fact", fact_id));
    }
    Ok(())
}

/// Load one fact with every reference resolved to its display name.
pub fn get_fact(conn: &Connection, fact_id: i64) -> Result<Option<FactRecord>, OperationError> {
    let sql = format!("{FACT_SELECT} WHERE faw.faw_id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let result = stmt.query_row(params![fact_id], row_to_fact);
    match result {
        Ok(f) => Ok(Some(f)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Load the fact for a film and actor identified by name rather than id.
pub fn find_fact_by_names(
    conn: &Connection,
    title: &str,
    year: i32,
    actor: &str,
) -> Result<Option<FactRecord>, OperationError> {
    let sql = format!("{FACT_SELECT} WHERE f.title = ?1 AND f.year = ?2 AND a.actor_name = ?3");
    let mut stmt = conn.prepare(&sql)?;
    stmt.query_row(params![title, year, actor], row_to_fact)
        .optional()
        .map_err(Into::into)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Shared projection for denormalized fact rows. Column order matches
/// [`row_to_fact`].
pub(crate) const FACT_SELECT: &str = "SELECT faw.faw_id, f.film_id, a.actor_id, f.title, f.year,
        a.actor_name, c.character_name, b.brand_name, w.model_reference,
        w.verification_level, faw.narrative_role, faw.source_url
 FROM film_actor_watch faw
 JOIN films f ON faw.film_id = f.film_id
 JOIN actors a ON faw.actor_id = a.actor_id
 JOIN characters c ON faw.character_id = c.character_id
 JOIN watches w ON faw.watch_id = w.watch_id
 JOIN brands b ON w.brand_id = b.brand_id";

pub(crate) fn row_to_fact(row: &rusqlite::Row<'_>) -> rusqlite::Result<FactRecord> {
    let verification: Option<String> = row.get(9)?;
    let narrative: Option<String> = row.get(10)?;
    Ok(FactRecord {
        fact_id: row.get(0)?,
        film_id: row.get(1)?,
        actor_id: row.get(2)?,
        title: row.get(3)?,
        year: row.get(4)?,
        actor: row.get(5)?,
        character: row.get(6)?,
        brand: row.get(7)?,
        model: row.get(8)?,
        verification: verification
            .as_deref()
            .map(VerificationLevel::from_str_loose)
            .unwrap_or(VerificationLevel::Unconfirmed),
        narrative: narrative.unwrap_or_default(),
        source_url: row.get(11)?,
    })
}

pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
