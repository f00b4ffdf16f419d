//! Fact repository: the insert/update path that keeps one fact per
//! (film, actor).
//!
//! `insert` resolves every dimension row, checks for an existing fact for the
//! same film and actor, and only then writes the new fact, all inside one
//! `BEGIN IMMEDIATE` transaction. A collision is returned as
//! [`InsertOutcome::Duplicate`] carrying both versions; it is never an error.
//! The unique index on `film_actor_watch(film_id, actor_id)` backs up the
//! pre-check, and a violation of it is reported the same way.

use filmwatch_catalog::types::{DuplicateConflict, FactRecord, WatchEntry};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::operations::{
    NewFact, OperationError, find_fact_by_names, find_fact_for, get_fact, insert_fact_row,
    update_fact_row, upsert_actor, upsert_brand, upsert_character, upsert_film, upsert_watch,
};

/// Result of [`FactRepository::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(FactRecord),
    Duplicate(DuplicateConflict),
}

/// Insert and update facts on a caller-owned connection.
pub struct FactRepository<'c> {
    conn: &'c Connection,
}

impl<'c> FactRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Store a parsed entry unless the actor already has a fact for the film.
    pub fn insert(&self, entry: &WatchEntry) -> Result<InsertOutcome, OperationError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let film_id = upsert_film(&tx, &entry.title, entry.year)?;
        let brand_id = upsert_brand(&tx, &entry.brand)?;
        let watch_id = upsert_watch(&tx, brand_id, &entry.model, entry.verification)?;
        let actor_id = upsert_actor(&tx, &entry.actor)?;

        if let Some(existing_id) = find_fact_for(&tx, film_id, actor_id)? {
            let existing =
                get_fact(&tx, existing_id)?.ok_or_else(|| OperationError::not_found("fact", existing_id))?;
            tx.rollback()?;
            log::warn!(
                "Duplicate entry: {} already has fact #{} for {} ({})",
                entry.actor,
                existing.fact_id,
                entry.title,
                entry.year
            );
            return Ok(InsertOutcome::Duplicate(DuplicateConflict {
                existing,
                new: entry.clone(),
            }));
        }

        let character_id = upsert_character(&tx, &entry.character)?;
        let new_fact = NewFact {
            film_id,
            actor_id,
            character_id,
            watch_id,
            narrative: &entry.narrative,
            source_url: entry.source_url.as_deref(),
        };

        match insert_fact_row(&tx, &new_fact) {
            Ok(fact_id) => {
                let record =
                    get_fact(&tx, fact_id)?.ok_or_else(|| OperationError::not_found("fact", fact_id))?;
                tx.commit()?;
                log::info!("Added fact #{}: {}", record.fact_id, record.summary());
                Ok(InsertOutcome::Inserted(record))
            }
            Err(err @ OperationError::UniqueViolation { .. }) => {
                tx.rollback()?;
                self.conflict_after_race(entry, err)
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the watch, character, narrative and (when given) source URL
    /// of an existing fact.
    ///
    /// The fact keeps its film and actor; the entry's title, year and actor
    /// are ignored. No duplicate check is made.
    pub fn update(&self, fact_id: i64, entry: &WatchEntry) -> Result<FactRecord, OperationError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if get_fact(&tx, fact_id)?.is_none() {
            return Err(OperationError::not_found("fact", fact_id));
        }

        let brand_id = upsert_brand(&tx, &entry.brand)?;
        let watch_id = upsert_watch(&tx, brand_id, &entry.model, entry.verification)?;
        let character_id = upsert_character(&tx, &entry.character)?;
        update_fact_row(
            &tx,
            fact_id,
            character_id,
            watch_id,
            &entry.narrative,
            entry.source_url.as_deref(),
        )?;

        let record = get_fact(&tx, fact_id)?.ok_or_else(|| OperationError::not_found("fact", fact_id))?;
        tx.commit()?;
        log::info!("Updated fact #{}: {}", record.fact_id, record.summary());
        Ok(record)
    }

    /// Load one fact by id.
    pub fn get(&self, fact_id: i64) -> Result<Option<FactRecord>, OperationError> {
        get_fact(self.conn, fact_id)
    }

    /// Another writer stored a fact for the pair between our check and our
    /// insert. Re-read it by name, since the ids we resolved were rolled back.
    fn conflict_after_race(
        &self,
        entry: &WatchEntry,
        err: OperationError,
    ) -> Result<InsertOutcome, OperationError> {
        log::warn!(
            "Unique index rejected fact for {} in {} ({}); reloading existing fact",
            entry.actor,
            entry.title,
            entry.year
        );
        match find_fact_by_names(self.conn, &entry.title, entry.year, &entry.actor)? {
            Some(existing) => Ok(InsertOutcome::Duplicate(DuplicateConflict {
                existing,
                new: entry.clone(),
            })),
            None => Err(err),
        }
    }
}
