//! Read queries for the film watch database.
//!
//! Lookups by actor, brand and film title use a literal, ASCII
//! case-insensitive substring match; no match is an empty result.

use filmwatch_catalog::types::*;
use rusqlite::{Connection, params};

use crate::operations::{FACT_SELECT, OperationError, row_to_fact};

/// How many brands [`get_stats`] reports.
pub const TOP_BRANDS_LIMIT: i64 = 10;

// ── Dimension Lookups ───────────────────────────────────────────────────────

/// Facts for every actor whose name contains `name`, newest film first.
pub fn query_actor(conn: &Connection, name: &str) -> Result<ActorQuery, OperationError> {
    let films = facts_where(
        conn,
        "a.actor_name LIKE ?1 ESCAPE '\\' ORDER BY f.year DESC, faw.faw_id",
        &[&like_pattern(name)],
    )?;
    Ok(ActorQuery {
        actor: name.to_string(),
        count: films.len(),
        films,
    })
}

/// Facts for every brand whose name contains `name`, newest film first.
pub fn query_brand(conn: &Connection, name: &str) -> Result<BrandQuery, OperationError> {
    let films = facts_where(
        conn,
        "b.brand_name LIKE ?1 ESCAPE '\\' ORDER BY f.year DESC, faw.faw_id",
        &[&like_pattern(name)],
    )?;
    Ok(BrandQuery {
        brand: name.to_string(),
        count: films.len(),
        films,
    })
}

/// Facts for every film whose title contains `title`, by actor name.
pub fn query_film(conn: &Connection, title: &str) -> Result<FilmQuery, OperationError> {
    let watches = facts_where(
        conn,
        "f.title LIKE ?1 ESCAPE '\\' ORDER BY a.actor_name ASC, faw.faw_id",
        &[&like_pattern(title)],
    )?;
    Ok(FilmQuery {
        film: title.to_string(),
        count: watches.len(),
        watches,
    })
}

/// Facts whose actor and film title both contain the given terms.
///
/// Used to look for near-duplicates (e.g. "Connery" vs "Sean Connery")
/// before deciding to update.
pub fn find_similar(
    conn: &Connection,
    actor: &str,
    title: &str,
) -> Result<Vec<FactRecord>, OperationError> {
    facts_where(
        conn,
        "a.actor_name LIKE ?1 ESCAPE '\\' AND f.title LIKE ?2 ESCAPE '\\' ORDER BY faw.faw_id",
        &[&like_pattern(actor), &like_pattern(title)],
    )
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Totals per entity type and the brands with the most facts.
pub fn get_stats(conn: &Connection) -> Result<WatchStats, OperationError> {
    let count = |table: &str| -> Result<i64, OperationError> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?)
    };

    let films = count("films")?;
    let actors = count("actors")?;
    let brands = count("brands")?;
    let entries = count("film_actor_watch")?;

    let mut stmt = conn.prepare(
        "SELECT b.brand_name, COUNT(*) AS n
         FROM film_actor_watch faw
         JOIN watches w ON faw.watch_id = w.watch_id
         JOIN brands b ON w.brand_id = b.brand_id
         GROUP BY b.brand_id
         ORDER BY n DESC, b.brand_id ASC
         LIMIT ?1",
    )?;
    let top_brands = stmt
        .query_map(params![TOP_BRANDS_LIMIT], |row| {
            Ok(BrandCount {
                brand: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WatchStats {
        films,
        actors,
        brands,
        entries,
        top_brands,
    })
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn facts_where(
    conn: &Connection,
    clause: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<FactRecord>, OperationError> {
    let sql = format!("{FACT_SELECT} WHERE {clause}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, row_to_fact)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// `%term%` with LIKE wildcards in `term` escaped by backslash.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Bond"), "%Bond%");
        assert_eq!(like_pattern("100%_x\\"), "%100\\%\\_x\\\\%");
    }
}
