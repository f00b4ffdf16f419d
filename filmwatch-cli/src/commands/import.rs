use std::cell::Cell;
use std::path::Path;

use filmwatch_catalog::types::WatchEntry;
use filmwatch_db::{ImportProgress, LegacyImportStats, RowOutcome, import_legacy};
use filmwatch_lib::FilmWatch;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// Progress bar for the legacy import with a running count of skipped rows.
/// Hidden with `--quiet`.
struct CliImportProgress {
    pb: ProgressBar,
    skipped: Cell<usize>,
}

impl CliImportProgress {
    fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::with_template(
                    "  [{bar:40.cyan/blue}] {pos}/{len} {prefix:.yellow} {msg}",
                )
                .expect("static pattern")
                .progress_chars("=> "),
            );
            pb
        };
        Self {
            pb,
            skipped: Cell::new(0),
        }
    }
}

impl ImportProgress for CliImportProgress {
    fn on_start(&self, source: &Path, total: usize) {
        self.pb
            .suspend(|| log::info!("Importing {} legacy facts from {}", total, source.display()));
        self.pb.set_length(total as u64);
    }

    fn on_row(&self, current: usize, entry: &WatchEntry, outcome: RowOutcome) {
        if let RowOutcome::Duplicate { kept_fact_id } = outcome {
            self.skipped.set(self.skipped.get() + 1);
            self.pb.set_prefix(format!("{} skipped", self.skipped.get()));
            log::debug!("Skipped {}: kept fact #{}", entry.summary(), kept_fact_id);
        }
        self.pb.set_position(current as u64);
        self.pb.set_message(super::truncate_str(&entry.summary(), 48));
    }

    fn on_finish(&self, stats: &LegacyImportStats) {
        self.pb.finish_and_clear();
        log::info!(
            "{} Imported {} of {} legacy facts ({} duplicates skipped)",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            stats.imported,
            stats.facts_read,
            stats.duplicates,
        );
    }
}

pub(crate) fn run_import_legacy(fw: &FilmWatch, path: &Path, quiet: bool) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::other(format!(
            "Legacy database not found: {}",
            path.display()
        )));
    }

    let progress = CliImportProgress::new(quiet);
    let stats = import_legacy(fw.connection(), path, Some(&progress)).map_err(|e| {
        progress.pb.finish_and_clear();
        CliError::database(format!("Legacy import failed: {}", e))
    })?;

    if stats.duplicates > 0 {
        log::info!(
            "  {} facts were skipped because the actor already had a fact for that film",
            stats.duplicates,
        );
        log::info!("  Run 'filmwatch similar <ACTOR> <FILM>' to see the fact that was kept.");
    }
    Ok(())
}
