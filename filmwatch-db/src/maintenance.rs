//! Administrative clean-up operations.
//!
//! None of these run on the insert path. Each one runs in its own
//! transaction and either applies completely or not at all.

use rusqlite::{Connection, Transaction, TransactionBehavior, params};

use crate::operations::{OperationError, find_fact_for, find_watch, upsert_brand};

/// Outcome of a duplicate-merge pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    /// Names that had more than one row.
    pub groups: usize,
    /// Rows folded into the surviving row and deleted.
    pub merged: usize,
    /// Facts left on a duplicate row because moving them would give an actor
    /// two facts for the same film.
    pub conflicts: usize,
}

/// Delete one fact.
pub fn delete_entry(conn: &Connection, fact_id: i64) -> Result<(), OperationError> {
    let tx = begin(conn)?;
    let changed = tx.execute(
        "DELETE FROM film_actor_watch WHERE faw_id = ?1",
        params![fact_id],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found("fact", fact_id));
    }
    tx.commit()?;
    log::info!("Deleted fact #{}", fact_id);
    Ok(())
}

/// Delete a brand that no watch refers to.
pub fn delete_brand(conn: &Connection, brand_id: i64) -> Result<(), OperationError> {
    let tx = begin(conn)?;
    let count: i64 = tx.query_row(
        "SELECT COUNT(*) FROM watches WHERE brand_id = ?1",
        params![brand_id],
        |row| row.get(0),
    )?;
    if count > 0 {
        return Err(OperationError::InUse {
            entity_type: "brand".to_string(),
            id: brand_id.to_string(),
            count,
        });
    }
    let changed = tx.execute("DELETE FROM brands WHERE brand_id = ?1", params![brand_id])?;
    if changed == 0 {
        return Err(OperationError::not_found("brand", brand_id));
    }
    tx.commit()?;
    log::info!("Deleted brand #{}", brand_id);
    Ok(())
}

/// Fold characters that share an exact name into the oldest row.
pub fn merge_duplicate_characters(conn: &Connection) -> Result<MergeStats, OperationError> {
    let tx = begin(conn)?;
    let groups = duplicate_groups(
        &tx,
        "SELECT character_id, character_name FROM characters
         WHERE character_name IN (
             SELECT character_name FROM characters
             GROUP BY character_name HAVING COUNT(*) > 1)
         ORDER BY character_name, character_id",
    )?;

    let mut stats = MergeStats {
        groups: groups.len(),
        ..Default::default()
    };
    for ids in &groups {
        let Some((keep, rest)) = ids.split_first() else {
            continue;
        };
        for old in rest {
            tx.execute(
                "UPDATE film_actor_watch SET character_id = ?1 WHERE character_id = ?2",
                params![keep, old],
            )?;
            tx.execute(
                "DELETE FROM characters WHERE character_id = ?1",
                params![old],
            )?;
            stats.merged += 1;
        }
    }

    tx.commit()?;
    log::info!(
        "Merged {} duplicate characters into {} unique characters",
        stats.merged,
        stats.groups
    );
    Ok(stats)
}

/// Fold actors whose names differ only in case or surrounding whitespace
/// into the oldest row.
///
/// A fact is only moved when the surviving actor has no fact for the same
/// film. Otherwise it stays on its original actor, which is then kept.
pub fn merge_duplicate_actors(conn: &Connection) -> Result<MergeStats, OperationError> {
    let tx = begin(conn)?;
    let groups = duplicate_groups(
        &tx,
        "SELECT actor_id, LOWER(TRIM(actor_name)) FROM actors
         WHERE LOWER(TRIM(actor_name)) IN (
             SELECT LOWER(TRIM(actor_name)) FROM actors
             GROUP BY LOWER(TRIM(actor_name)) HAVING COUNT(*) > 1)
         ORDER BY LOWER(TRIM(actor_name)), actor_id",
    )?;

    let mut stats = MergeStats {
        groups: groups.len(),
        ..Default::default()
    };
    for ids in &groups {
        let Some((keep, rest)) = ids.split_first() else {
            continue;
        };
        for old in rest {
            let facts: Vec<(i64, i64)> = {
                let mut stmt = tx.prepare(
                    "SELECT faw_id, film_id FROM film_actor_watch WHERE actor_id = ?1
                     ORDER BY faw_id",
                )?;
                let rows = stmt.query_map(params![old], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect::<Result<Vec<_>, _>>()?
            };

            let mut stuck = 0;
            for (fact_id, film_id) in facts {
                if find_fact_for(&tx, film_id, *keep)?.is_some() {
                    log::warn!(
                        "Fact #{} left on actor #{}: actor #{} already has a fact for film #{}",
                        fact_id,
                        old,
                        keep,
                        film_id
                    );
                    stuck += 1;
                    continue;
                }
                tx.execute(
                    "UPDATE film_actor_watch SET actor_id = ?1 WHERE faw_id = ?2",
                    params![keep, fact_id],
                )?;
            }

            if stuck == 0 {
                tx.execute("DELETE FROM actors WHERE actor_id = ?1", params![old])?;
                stats.merged += 1;
            }
            stats.conflicts += stuck;
        }
    }

    tx.commit()?;
    log::info!(
        "Merged {} duplicate actors into {} unique actors ({} conflicts)",
        stats.merged,
        stats.groups,
        stats.conflicts
    );
    Ok(stats)
}

/// Repair watches stored under the brand "a" or "an".
///
/// The first word of the model becomes the brand and the rest the model. If
/// the repaired watch already exists, facts move to it and the stray watch is
/// deleted. Article brands left without watches are removed. Returns the
/// number of watches repaired.
pub fn fix_article_brands(conn: &Connection) -> Result<usize, OperationError> {
    let tx = begin(conn)?;

    let bad: Vec<(i64, String)> = {
        let mut stmt = tx.prepare(
            "SELECT w.watch_id, w.model_reference
             FROM watches w JOIN brands b ON w.brand_id = b.brand_id
             WHERE LOWER(b.brand_name) IN ('a', 'an')
             ORDER BY w.watch_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let mut fixed = 0;
    for (watch_id, model) in bad {
        let model = model.trim();
        let (brand, rest) = match model.split_once(char::is_whitespace) {
            Some((b, r)) => (b, r.trim()),
            None => (model, model),
        };
        if brand.is_empty() {
            log::warn!("Watch #{} has an empty model; left unchanged", watch_id);
            continue;
        }

        let brand_id = upsert_brand(&tx, brand)?;
        match find_watch(&tx, brand_id, rest)? {
            Some(target) if target != watch_id => {
                tx.execute(
                    "UPDATE film_actor_watch SET watch_id = ?1 WHERE watch_id = ?2",
                    params![target, watch_id],
                )?;
                tx.execute("DELETE FROM watches WHERE watch_id = ?1", params![watch_id])?;
                log::debug!("Watch #{} folded into existing watch #{}", watch_id, target);
            }
            _ => {
                tx.execute(
                    "UPDATE watches SET brand_id = ?1, model_reference = ?2 WHERE watch_id = ?3",
                    params![brand_id, rest, watch_id],
                )?;
                log::debug!("Watch #{} moved to brand '{}' model '{}'", watch_id, brand, rest);
            }
        }
        fixed += 1;
    }

    let removed = tx.execute(
        "DELETE FROM brands
         WHERE LOWER(brand_name) IN ('a', 'an')
           AND brand_id NOT IN (SELECT DISTINCT brand_id FROM watches)",
        [],
    )?;

    tx.commit()?;
    log::info!(
        "Fixed {} watches with bad brand names, removed {} article brands",
        fixed,
        removed
    );
    Ok(fixed)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn begin(conn: &Connection) -> Result<Transaction<'_>, OperationError> {
    Ok(Transaction::new_unchecked(
        conn,
        TransactionBehavior::Immediate,
    )?)
}

/// Run a query yielding `(id, key)` ordered by key then id, and group the
/// ids by key. Every group has at least two ids, lowest first.
fn duplicate_groups(conn: &Connection, sql: &str) -> Result<Vec<Vec<i64>>, OperationError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: Vec<Vec<i64>> = Vec::new();
    let mut last_key: Option<String> = None;
    for (id, key) in rows {
        match groups.last_mut() {
            Some(group) if last_key.as_deref() == Some(key.as_str()) => group.push(id),
            _ => groups.push(vec![id]),
        }
        last_key = Some(key);
    }
    Ok(groups)
}
