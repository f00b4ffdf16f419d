pub(crate) mod admin;
pub(crate) mod config;
pub(crate) mod entry;
pub(crate) mod import;
pub(crate) mod lexicon;
pub(crate) mod query;

use filmwatch_catalog::types::FactRecord;
use filmwatch_lib::{FilmWatch, Settings};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use crate::CliError;

/// Open the configured catalog database.
pub(crate) fn open_catalog(settings: &Settings) -> Result<FilmWatch, CliError> {
    FilmWatch::open(settings).map_err(|e| {
        CliError::database(format!(
            "Failed to open {}: {}",
            settings.db_path.display(),
            e
        ))
    })
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::other(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// One fact as a short block: id, film, actor/character, watch, then the
/// narrative and source underneath.
pub(crate) fn log_fact(fact: &FactRecord) {
    log::info!(
        "  {} {} ({})  {} as {}",
        format!("#{}", fact.fact_id).if_supports_color(Stdout, |t| t.dimmed()),
        fact.title.if_supports_color(Stdout, |t| t.bold()),
        fact.year,
        fact.actor,
        fact.character,
    );
    log::info!(
        "      {} {} [{}]",
        fact.brand.if_supports_color(Stdout, |t| t.cyan()),
        fact.model,
        fact.verification,
    );
    log::info!(
        "      {}",
        fact.narrative.if_supports_color(Stdout, |t| t.dimmed())
    );
    if let Some(url) = &fact.source_url {
        log::info!("      {}", url.if_supports_color(Stdout, |t| t.underline()));
    }
}

/// Quote an argument for a POSIX shell.
pub(crate) fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:".contains(c))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plain_and_spaced() {
        assert_eq!(shell_quote("42"), "42");
        assert_eq!(shell_quote("https://example.com/a_b"), "https://example.com/a_b");
        assert_eq!(
            shell_quote("Sean Connery wears a Rolex"),
            "'Sean Connery wears a Rolex'"
        );
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn quote_embedded_single_quote() {
        assert_eq!(shell_quote("Bond's watch"), r"'Bond'\''s watch'");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate_str("Submariner", 20), "Submariner");
        assert_eq!(truncate_str("Jaeger-LeCoultre Reverso", 10), "Jaeger-...");
        assert_eq!(truncate_str("Léon: The Professional", 5), "Lé...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }
}
