//! Import facts from a database written by the earlier web plugin.
//!
//! That schema has the same five dimension tables and a `film_actor_watch`
//! table keyed on the full (film, actor, character, watch) tuple, so one
//! actor may hold several facts for a film there. Rows are read in id order
//! and fed through [`FactRepository::insert`]; the first fact per (film,
//! actor) wins and the rest are counted as duplicates.

use std::path::Path;

use filmwatch_catalog::types::{CharacterSource, DEFAULT_NARRATIVE, VerificationLevel, WatchEntry};
use rusqlite::{Connection, OpenFlags};

use crate::operations::OperationError;
use crate::progress::{ImportProgress, RowOutcome};
use crate::repository::{FactRepository, InsertOutcome};
use crate::schema::table_exists;

/// Statistics from a legacy import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LegacyImportStats {
    pub facts_read: usize,
    pub imported: usize,
    pub duplicates: usize,
}

/// Copy every fact from the legacy database at `legacy_path` into `conn`.
///
/// The legacy file is opened read-only and never modified.
pub fn import_legacy(
    conn: &Connection,
    legacy_path: &Path,
    progress: Option<&dyn ImportProgress>,
) -> Result<LegacyImportStats, OperationError> {
    let entries = read_legacy_entries(legacy_path)?;
    if let Some(p) = progress {
        p.on_start(legacy_path, entries.len());
    }

    let repo = FactRepository::new(conn);
    let mut stats = LegacyImportStats {
        facts_read: entries.len(),
        ..Default::default()
    };

    for (i, entry) in entries.iter().enumerate() {
        let outcome = match repo.insert(entry)? {
            InsertOutcome::Inserted(fact) => {
                stats.imported += 1;
                RowOutcome::Imported {
                    fact_id: fact.fact_id,
                }
            }
            InsertOutcome::Duplicate(conflict) => {
                stats.duplicates += 1;
                RowOutcome::Duplicate {
                    kept_fact_id: conflict.existing.fact_id,
                }
            }
        };
        if let Some(p) = progress {
            p.on_row(i + 1, entry, outcome);
        }
    }

    if let Some(p) = progress {
        p.on_finish(&stats);
    }
    Ok(stats)
}

/// Read and denormalize every legacy fact, oldest first.
pub fn read_legacy_entries(legacy_path: &Path) -> Result<Vec<WatchEntry>, OperationError> {
    let legacy = Connection::open_with_flags(
        legacy_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    if !table_exists(&legacy, "film_actor_watch")? {
        return Err(OperationError::not_found(
            "table",
            format!("film_actor_watch in {}", legacy_path.display()),
        ));
    }

    let has_source_url: bool = legacy.query_row(
        "SELECT EXISTS(SELECT 1 FROM pragma_table_info('film_actor_watch')
                       WHERE name = 'source_url')",
        [],
        |row| row.get(0),
    )?;
    let source_col = if has_source_url {
        "faw.source_url"
    } else {
        "NULL"
    };

    let sql = format!(
        "SELECT f.title, f.year, a.actor_name, c.character_name, b.brand_name,
                w.model_reference, w.verification_level, faw.narrative_role, {source_col}
         FROM film_actor_watch faw
         JOIN films f ON faw.film_id = f.film_id
         JOIN actors a ON faw.actor_id = a.actor_id
         JOIN characters c ON faw.character_id = c.character_id
         JOIN watches w ON faw.watch_id = w.watch_id
         JOIN brands b ON w.brand_id = b.brand_id
         ORDER BY faw.faw_id"
    );
    let mut stmt = legacy.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let verification: Option<String> = row.get(6)?;
        let narrative: Option<String> = row.get(7)?;
        Ok(WatchEntry {
            title: row.get(0)?,
            year: row.get(1)?,
            actor: row.get(2)?,
            character: row.get(3)?,
            character_source: CharacterSource::Explicit,
            brand: row.get(4)?,
            model: row.get(5)?,
            verification: verification
                .as_deref()
                .map(VerificationLevel::from_str_loose)
                .unwrap_or(VerificationLevel::Unconfirmed),
            narrative: narrative
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NARRATIVE.to_string()),
            source_url: row.get(8)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
