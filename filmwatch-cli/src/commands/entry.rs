use std::path::Path;

use filmwatch_catalog::types::{CharacterSource, DuplicateConflict};
use filmwatch_catalog::{BrandLexicon, parse_entry_with};
use filmwatch_lib::{EntryError, FilmWatch, InsertOutcome};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::EntryExtras;

use super::{log_fact, print_json, shell_quote, truncate_str};

const COLUMN_WIDTH: usize = 32;

/// Parse a sentence and show what would be stored. No database is opened.
pub(crate) fn run_parse(lexicon: &BrandLexicon, text: &str, json: bool) -> Result<(), CliError> {
    let entry = parse_entry_with(text, lexicon).map_err(EntryError::from)?;
    if json {
        return print_json(&entry);
    }

    log::info!("{}", "Parsed entry".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Actor:        {}", entry.actor);
    match entry.character_source {
        CharacterSource::ActorSurname => log::info!(
            "  Character:    {} {}",
            entry.character,
            "(guessed from surname)".if_supports_color(Stdout, |t| t.yellow()),
        ),
        _ => log::info!("  Character:    {}", entry.character),
    }
    log::info!("  Brand:        {}", entry.brand);
    log::info!("  Model:        {}", entry.model);
    log::info!("  Film:         {} ({})", entry.title, entry.year);
    log::info!("  Verification: {}", entry.verification);
    log::info!("  Narrative:    {}", entry.narrative);
    Ok(())
}

/// Store one sentence, or every line of a file.
pub(crate) fn run_add(
    fw: &FilmWatch,
    text: Option<&str>,
    file: Option<&Path>,
    extras: &EntryExtras,
) -> Result<(), CliError> {
    match (text, file) {
        (_, Some(path)) => run_add_file(fw, path, extras),
        (Some(text), None) => {
            match add_one(fw, text, extras)? {
                InsertOutcome::Inserted(fact) => {
                    log::info!(
                        "{} Added fact #{}",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        fact.fact_id,
                    );
                    log_fact(&fact);
                }
                InsertOutcome::Duplicate(conflict) => report_conflict(&conflict, text, extras),
            }
            Ok(())
        }
        (None, None) => Err(CliError::other("Nothing to add: give a sentence or --file")),
    }
}

fn add_one(
    fw: &FilmWatch,
    text: &str,
    extras: &EntryExtras,
) -> Result<InsertOutcome, EntryError> {
    fw.add_entry(
        text,
        extras.narrative.as_deref(),
        extras.source_url.as_deref(),
    )
}

fn run_add_file(fw: &FilmWatch, path: &Path, extras: &EntryExtras) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::other(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut added = 0usize;
    let mut duplicates = 0usize;
    let mut unparsed = 0usize;

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = index + 1;
        match add_one(fw, line, extras) {
            Ok(InsertOutcome::Inserted(fact)) => {
                added += 1;
                log::info!("  line {}: added #{} {}", line_no, fact.fact_id, fact.summary());
            }
            Ok(InsertOutcome::Duplicate(conflict)) => {
                duplicates += 1;
                log::info!(
                    "  line {}: {} (kept #{})",
                    line_no,
                    "duplicate".if_supports_color(Stdout, |t| t.yellow()),
                    conflict.existing.fact_id,
                );
            }
            Err(EntryError::Parse(e)) => {
                unparsed += 1;
                log::warn!("line {}: {}: {}", line_no, e, line);
            }
            Err(e) => return Err(e.into()),
        }
    }

    crate::log_blank();
    log::info!(
        "{} added, {} duplicates, {} could not be parsed",
        added.if_supports_color(Stdout, |t| t.green()),
        duplicates,
        unparsed,
    );
    Ok(())
}

/// Show the stored fact next to the rejected one and how to overwrite it.
fn report_conflict(conflict: &DuplicateConflict, text: &str, extras: &EntryExtras) {
    let existing = &conflict.existing;
    let new = &conflict.new;

    log::info!(
        "{}",
        format!(
            "{} already has a watch recorded for {} ({})",
            existing.actor, existing.title, existing.year
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    log::info!(
        "  {:<12} {:<width$} {}",
        "",
        format!("Existing (#{})", existing.fact_id),
        "New",
        width = COLUMN_WIDTH,
    );

    let existing_url = existing.source_url.clone().unwrap_or_default();
    let new_url = new.source_url.clone().unwrap_or_default();
    let rows: [(&str, &str, &str); 5] = [
        ("Character", existing.character.as_str(), new.character.as_str()),
        ("Brand", existing.brand.as_str(), new.brand.as_str()),
        ("Model", existing.model.as_str(), new.model.as_str()),
        ("Narrative", existing.narrative.as_str(), new.narrative.as_str()),
        ("Source URL", existing_url.as_str(), new_url.as_str()),
    ];
    for (label, old_value, new_value) in rows {
        let old_cell = format!(
            "{:<width$}",
            truncate_str(old_value, COLUMN_WIDTH),
            width = COLUMN_WIDTH
        );
        let new_cell = truncate_str(new_value, COLUMN_WIDTH);
        if old_value == new_value {
            log::info!("  {:<12} {} {}", label, old_cell, new_cell);
        } else {
            log::info!(
                "  {:<12} {} {}",
                label,
                old_cell,
                new_cell.if_supports_color(Stdout, |t| t.yellow()),
            );
        }
    }

    crate::log_blank();
    log::info!("To replace the existing fact, run:");
    let mut command = format!("filmwatch update {} {}", existing.fact_id, shell_quote(text));
    if let Some(n) = &extras.narrative {
        command.push_str(&format!(" --narrative {}", shell_quote(n)));
    }
    if let Some(u) = &extras.source_url {
        command.push_str(&format!(" --source-url {}", shell_quote(u)));
    }
    log::info!("  {}", command.if_supports_color(Stdout, |t| t.cyan()));
}

/// Overwrite an existing fact.
pub(crate) fn run_update(
    fw: &FilmWatch,
    fact_id: i64,
    text: &str,
    extras: &EntryExtras,
) -> Result<(), CliError> {
    let fact = fw.update_entry(
        fact_id,
        text,
        extras.narrative.as_deref(),
        extras.source_url.as_deref(),
    )?;
    log::info!(
        "{} Updated fact #{}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        fact.fact_id,
    );
    log_fact(&fact);
    Ok(())
}
