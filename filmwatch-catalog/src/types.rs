//! Data model types for the film watch catalog.
//!
//! Two shapes flow through the system: a [`WatchEntry`] is what the parser
//! produces from free text (nothing has been stored yet), and a
//! [`FactRecord`] is a stored film/actor/watch association read back with
//! every reference resolved to its display name.

use serde::{Deserialize, Serialize};

/// Narrative stored when the submitter does not supply one.
pub const DEFAULT_NARRATIVE: &str = "Watch worn in film.";

// ── Verification ────────────────────────────────────────────────────────────

/// How well a watch identification is backed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerificationLevel {
    #[default]
    Confirmed,
    Unconfirmed,
    Disputed,
}

impl VerificationLevel {
    /// The string stored in the `verification_level` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Unconfirmed => "Unconfirmed",
            Self::Disputed => "Disputed",
        }
    }

    /// Parse a stored value, treating anything unrecognised as unconfirmed.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "disputed" => Self::Disputed,
            _ => Self::Unconfirmed,
        }
    }
}

impl std::fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Parsed entry ────────────────────────────────────────────────────────────

/// Where the character name of a parsed entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterSource {
    /// "In Film (Year), Actor as Character wears ..."
    Explicit,
    /// "Actor as Character wears ..." inside the actor segment.
    ActorClause,
    /// Guessed from the actor's surname. Low confidence.
    ActorSurname,
}

/// A structured fact extracted from a submission, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub actor: String,
    pub character: String,
    pub character_source: CharacterSource,
    pub brand: String,
    pub model: String,
    pub title: String,
    pub year: i32,
    pub verification: VerificationLevel,
    pub narrative: String,
    pub source_url: Option<String>,
}

impl WatchEntry {
    /// Replace the default narrative with a caller-supplied one.
    ///
    /// Blank strings count as "not supplied".
    pub fn with_narrative(mut self, narrative: Option<String>) -> Self {
        if let Some(n) = narrative.filter(|n| !n.trim().is_empty()) {
            self.narrative = n;
        }
        self
    }

    /// Attach a reference URL. Blank strings count as "not supplied".
    pub fn with_source_url(mut self, source_url: Option<String>) -> Self {
        if let Some(url) = source_url.filter(|u| !u.trim().is_empty()) {
            self.source_url = Some(url.trim().to_string());
        }
        self
    }

    /// One-line human description, e.g. "Sean Connery wearing Rolex Submariner in Dr. No (1962)".
    pub fn summary(&self) -> String {
        format!(
            "{} wearing {} {} in {} ({})",
            self.actor, self.brand, self.model, self.title, self.year
        )
    }
}

// ── Stored fact ─────────────────────────────────────────────────────────────

/// A stored film/actor/watch association with all names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub fact_id: i64,
    pub film_id: i64,
    pub actor_id: i64,
    pub title: String,
    pub year: i32,
    pub actor: String,
    pub character: String,
    pub brand: String,
    pub model: String,
    pub verification: VerificationLevel,
    pub narrative: String,
    pub source_url: Option<String>,
}

impl FactRecord {
    /// True when every denormalized field equals the corresponding field of `entry`.
    ///
    /// Verification is excluded: it belongs to the watch row and is fixed
    /// when the watch is first created.
    pub fn describes(&self, entry: &WatchEntry) -> bool {
        self.title == entry.title
            && self.year == entry.year
            && self.actor == entry.actor
            && self.character == entry.character
            && self.brand == entry.brand
            && self.model == entry.model
            && self.narrative == entry.narrative
            && self.source_url == entry.source_url
    }

    pub fn summary(&self) -> String {
        format!(
            "{} wearing {} {} in {} ({})",
            self.actor, self.brand, self.model, self.title, self.year
        )
    }
}

/// An insert that collided with an existing fact for the same film and actor.
///
/// Carries both versions so the caller can decide whether to overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateConflict {
    pub existing: FactRecord,
    pub new: WatchEntry,
}

// ── Query results ───────────────────────────────────────────────────────────

/// Facts for actors whose name contains the search term, newest film first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorQuery {
    pub actor: String,
    pub count: usize,
    pub films: Vec<FactRecord>,
}

/// Facts for brands whose name contains the search term, newest film first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandQuery {
    pub brand: String,
    pub count: usize,
    pub films: Vec<FactRecord>,
}

/// Facts for films whose title contains the search term, by actor name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmQuery {
    pub film: String,
    pub count: usize,
    pub watches: Vec<FactRecord>,
}

/// Number of facts recorded for one brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCount {
    pub brand: String,
    pub count: i64,
}

/// Totals per entity type plus the most-sighted brands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchStats {
    pub films: i64,
    pub actors: i64,
    pub brands: i64,
    pub entries: i64,
    pub top_brands: Vec<BrandCount>,
}
