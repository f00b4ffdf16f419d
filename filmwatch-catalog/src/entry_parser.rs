//! Parser for free-text watch sightings.
//!
//! Submissions follow one of three loose sentence shapes:
//! ```text
//! Sean Connery wears a Rolex Submariner watch in the 1962 film Dr. No
//! Daniel Craig wears an Omega Seamaster in Casino Royale (2006)
//! In Goldfinger (1964), Sean Connery as James Bond wears a Rolex Submariner
//! ```
//!
//! The shapes are tried in that order and the first match wins. The watch
//! phrase is then split into brand and model with the help of a
//! [`BrandLexicon`].

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::lexicon::{BrandLexicon, strip_prefix_ignore_case};
use crate::types::{CharacterSource, DEFAULT_NARRATIVE, VerificationLevel, WatchEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Could not parse entry")]
    CouldNotParse,
}

// Captures: actor, watch phrase, year, title.
static YEAR_BEFORE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.+?)\s+(?:wears?|wearing|wore)\s+(.+?)\s+(?:watch\s+)?in\s+(?:the\s+)?(?:movie\s+)?([0-9]{4})\s+(?:\w+\s+)?(.+?)$",
    )
    .expect("static pattern")
});

// Captures: actor, watch phrase, title, year.
static TITLE_THEN_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.+?)\s+(?:wears?|wearing|wore)\s+(.+?)\s+in\s+(?:(?:the\s+)?(?:movie|film)\s+)?(.+?)\s+\(([0-9]{4})\)$",
    )
    .expect("static pattern")
});

// Captures: title, year, actor, character, watch phrase.
static FILM_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^In\s+(.+?)\s+\(([0-9]{4})\),\s+(.+?)\s+(?:as|plays)\s+(.+?)\s+(?:wears?|wearing|wore)\s+(.+?)$",
    )
    .expect("static pattern")
});

static ACTOR_AS_CHARACTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:as|plays)\s+(.+)$").expect("static pattern")
});

static BUILTIN_LEXICON: LazyLock<BrandLexicon> = LazyLock::new(BrandLexicon::builtin);

/// Parse a submission using the built-in brand table.
///
/// # Examples
///
/// ```
/// use filmwatch_catalog::entry_parser::parse_entry;
///
/// let e = parse_entry("Daniel Craig wears an Omega Seamaster in Casino Royale (2006).").unwrap();
/// assert_eq!(e.actor, "Daniel Craig");
/// assert_eq!(e.brand, "Omega");
/// assert_eq!(e.model, "Seamaster");
/// assert_eq!(e.title, "Casino Royale");
/// assert_eq!(e.year, 2006);
///
/// let e = parse_entry("In Goldfinger (1964), Sean Connery as James Bond wears a Rolex Submariner").unwrap();
/// assert_eq!(e.character, "James Bond");
/// ```
pub fn parse_entry(text: &str) -> Result<WatchEntry, ParseError> {
    parse_entry_with(text, &BUILTIN_LEXICON)
}

/// Parse a submission using a caller-supplied brand table.
pub fn parse_entry_with(text: &str, lexicon: &BrandLexicon) -> Result<WatchEntry, ParseError> {
    let text = normalize(text);
    let sentence = match_sentence(text).ok_or(ParseError::CouldNotParse)?;
    let year: i32 = sentence
        .year
        .parse()
        .map_err(|_| ParseError::CouldNotParse)?;

    let (actor, character, character_source) =
        resolve_character(sentence.actor, sentence.character);
    let (brand, model) = split_watch_phrase(sentence.watch, lexicon);

    Ok(WatchEntry {
        actor,
        character,
        character_source,
        brand,
        model,
        title: sentence.title.trim().to_string(),
        year,
        verification: VerificationLevel::Confirmed,
        narrative: DEFAULT_NARRATIVE.to_string(),
        source_url: None,
    })
}

/// Split a watch phrase into `(brand, model)`.
///
/// In priority order:
/// 1. a "by <Brand>" / "from <Brand>" attribution anywhere in the phrase;
/// 2. a lexicon brand at the start of the phrase;
/// 3. the first word as brand, the rest as model.
///
/// A leading "a"/"an" is kept in the model for rule 1 and dropped for rules
/// 2 and 3, so an article is never taken for a brand.
pub fn split_watch_phrase(phrase: &str, lexicon: &BrandLexicon) -> (String, String) {
    let phrase = phrase.trim();

    if let Some(attr) = lexicon.find_attribution(phrase) {
        let model = format!("{}{}", &phrase[..attr.start], &phrase[attr.end..]);
        return (attr.brand.to_string(), model.trim().to_string());
    }

    let bare = strip_article(phrase);

    if let Some((brand, rest)) = lexicon.find_prefix(bare) {
        return (brand.to_string(), rest.trim().to_string());
    }

    match bare.split_once(char::is_whitespace) {
        Some((brand, model)) => (brand.to_string(), model.trim().to_string()),
        None => (bare.to_string(), bare.to_string()),
    }
}

// ── Internal parsing ────────────────────────────────────────────────────────

/// Raw captures from whichever sentence shape matched.
#[derive(Debug)]
struct SentenceMatch<'a> {
    actor: &'a str,
    character: Option<&'a str>,
    watch: &'a str,
    title: &'a str,
    year: &'a str,
}

/// Trim surrounding whitespace and a single trailing period.
fn normalize(text: &str) -> &str {
    let text = text.trim();
    text.strip_suffix('.').unwrap_or(text).trim_end()
}

fn match_sentence(text: &str) -> Option<SentenceMatch<'_>> {
    if let Some(c) = YEAR_BEFORE_TITLE.captures(text) {
        return Some(SentenceMatch {
            actor: c.get(1)?.as_str(),
            character: None,
            watch: c.get(2)?.as_str(),
            year: c.get(3)?.as_str(),
            title: c.get(4)?.as_str(),
        });
    }

    if let Some(c) = TITLE_THEN_YEAR.captures(text) {
        return Some(SentenceMatch {
            actor: c.get(1)?.as_str(),
            character: None,
            watch: c.get(2)?.as_str(),
            title: c.get(3)?.as_str(),
            year: c.get(4)?.as_str(),
        });
    }

    let c = FILM_FIRST.captures(text)?;
    Some(SentenceMatch {
        title: c.get(1)?.as_str(),
        year: c.get(2)?.as_str(),
        actor: c.get(3)?.as_str(),
        character: Some(c.get(4)?.as_str()),
        watch: c.get(5)?.as_str(),
    })
}

/// Work out `(actor, character, source)` from the actor segment.
fn resolve_character(
    actor_segment: &str,
    explicit: Option<&str>,
) -> (String, String, CharacterSource) {
    let actor_segment = actor_segment.trim();

    if let Some(character) = explicit {
        return (
            actor_segment.to_string(),
            character.trim().to_string(),
            CharacterSource::Explicit,
        );
    }

    if let Some(c) = ACTOR_AS_CHARACTER.captures(actor_segment)
        && let (Some(name), Some(character)) = (c.get(1), c.get(2))
    {
        return (
            name.as_str().trim().to_string(),
            character.as_str().trim().to_string(),
            CharacterSource::ActorClause,
        );
    }

    let surname = actor_segment
        .split_whitespace()
        .last()
        .unwrap_or(actor_segment)
        .to_string();
    (
        actor_segment.to_string(),
        surname,
        CharacterSource::ActorSurname,
    )
}

/// Drop one leading "a" / "an" when something follows it.
fn strip_article(phrase: &str) -> &str {
    for article in ["an ", "a "] {
        if let Some(rest) = strip_prefix_ignore_case(phrase, article) {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    phrase
}
