//! The catalog service: parse, add, update, and query watch sightings.

use filmwatch_catalog::types::{
    ActorQuery, BrandQuery, DEFAULT_NARRATIVE, FactRecord, FilmQuery, WatchEntry, WatchStats,
};
use filmwatch_catalog::{BrandLexicon, parse_entry_with};
use filmwatch_db::{FactRepository, InsertOutcome, open_database, open_memory, queries};
use rusqlite::Connection;

use crate::error::EntryError;
use crate::settings::Settings;

/// An open catalog plus the brand lexicon used to read submissions.
///
/// This is the main entry point for using the library. Open one from
/// resolved [`Settings`], then call the entry and query operations on it.
pub struct FilmWatch {
    conn: Connection,
    lexicon: BrandLexicon,
    default_narrative: String,
}

impl FilmWatch {
    /// Open the configured database (creating its directory if needed) and
    /// load the configured lexicon.
    pub fn open(settings: &Settings) -> Result<Self, EntryError> {
        if let Some(parent) = settings.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let lexicon = settings.load_lexicon()?;
        let conn = open_database(&settings.db_path)?;
        log::debug!("Opened catalog at {}", settings.db_path.display());
        Ok(Self::new(conn, lexicon).with_default_narrative(&settings.default_narrative))
    }

    pub fn new(conn: Connection, lexicon: BrandLexicon) -> Self {
        Self {
            conn,
            lexicon,
            default_narrative: DEFAULT_NARRATIVE.to_string(),
        }
    }

    /// Empty in-memory catalog with the built-in lexicon.
    pub fn in_memory() -> Result<Self, EntryError> {
        Ok(Self::new(open_memory()?, BrandLexicon::builtin()))
    }

    /// Narrative stored when an entry is added without one.
    pub fn with_default_narrative(mut self, narrative: &str) -> Self {
        if !narrative.trim().is_empty() {
            self.default_narrative = narrative.to_string();
        }
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn lexicon(&self) -> &BrandLexicon {
        &self.lexicon
    }

    // ── Entry operations ────────────────────────────────────────────────────

    /// Parse a submission without storing anything.
    pub fn parse_entry(&self, text: &str) -> Result<WatchEntry, EntryError> {
        Ok(parse_entry_with(text, &self.lexicon)?)
    }

    /// Parse and store a submission.
    ///
    /// A second sighting for the same film and actor comes back as
    /// [`InsertOutcome::Duplicate`] with both versions, not as an error.
    pub fn add_entry(
        &self,
        text: &str,
        narrative: Option<&str>,
        source_url: Option<&str>,
    ) -> Result<InsertOutcome, EntryError> {
        let entry = self.prepare(text, narrative, source_url)?;
        Ok(FactRepository::new(&self.conn).insert(&entry)?)
    }

    /// Overwrite the watch, character and narrative of an existing fact with
    /// those parsed from `text`. The fact keeps its film and actor.
    pub fn update_entry(
        &self,
        fact_id: i64,
        text: &str,
        narrative: Option<&str>,
        source_url: Option<&str>,
    ) -> Result<FactRecord, EntryError> {
        let entry = self.prepare(text, narrative, source_url)?;
        Ok(FactRepository::new(&self.conn).update(fact_id, &entry)?)
    }

    fn prepare(
        &self,
        text: &str,
        narrative: Option<&str>,
        source_url: Option<&str>,
    ) -> Result<WatchEntry, EntryError> {
        let mut entry = self.parse_entry(text)?;
        entry.narrative = self.default_narrative.clone();
        Ok(entry
            .with_narrative(narrative.map(str::to_string))
            .with_source_url(source_url.map(str::to_string)))
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn query_actor(&self, name: &str) -> Result<ActorQuery, EntryError> {
        Ok(queries::query_actor(&self.conn, name)?)
    }

    pub fn query_brand(&self, name: &str) -> Result<BrandQuery, EntryError> {
        Ok(queries::query_brand(&self.conn, name)?)
    }

    pub fn query_film(&self, title: &str) -> Result<FilmQuery, EntryError> {
        Ok(queries::query_film(&self.conn, title)?)
    }

    pub fn get_stats(&self) -> Result<WatchStats, EntryError> {
        Ok(queries::get_stats(&self.conn)?)
    }

    /// Facts whose actor and title contain both terms, for spotting
    /// near-duplicates before an update.
    pub fn find_similar(&self, actor: &str, title: &str) -> Result<Vec<FactRecord>, EntryError> {
        Ok(queries::find_similar(&self.conn, actor, title)?)
    }
}
