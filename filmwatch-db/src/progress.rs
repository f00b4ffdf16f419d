//! Progress reporting for the legacy import.
//!
//! [`import_legacy`](crate::legacy::import_legacy) offers every legacy row to
//! the repository and tells the observer what became of it, so a front end can
//! show how many rows were stored and how many collided with an existing fact.

use std::cell::Cell;
use std::path::Path;

use filmwatch_catalog::types::WatchEntry;

use crate::legacy::LegacyImportStats;

/// What became of one legacy row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Stored as a new fact.
    Imported { fact_id: i64 },
    /// Skipped because the actor already has this fact for the film.
    Duplicate { kept_fact_id: i64 },
}

impl RowOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, RowOutcome::Duplicate { .. })
    }
}

/// Observer for [`import_legacy`](crate::legacy::import_legacy).
pub trait ImportProgress {
    /// The legacy file was read and `total` rows will follow.
    fn on_start(&self, source: &Path, total: usize);

    /// One row was offered to the repository. `current` counts from 1.
    fn on_row(&self, current: usize, entry: &WatchEntry, outcome: RowOutcome);

    fn on_finish(&self, stats: &LegacyImportStats);
}

pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_start(&self, _source: &Path, _total: usize) {}
    fn on_row(&self, _current: usize, _entry: &WatchEntry, _outcome: RowOutcome) {}
    fn on_finish(&self, _stats: &LegacyImportStats) {}
}

/// Logs a checkpoint every [`LogProgress::EVERY`] rows with the running
/// imported/skipped split, and each skipped row at debug level.
#[derive(Debug, Default)]
pub struct LogProgress {
    skipped: Cell<usize>,
}

impl LogProgress {
    pub const EVERY: usize = 100;

    /// Rows skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped.get()
    }
}

impl ImportProgress for LogProgress {
    fn on_start(&self, source: &Path, total: usize) {
        self.skipped.set(0);
        log::info!("Importing {} legacy facts from {}", total, source.display());
    }

    fn on_row(&self, current: usize, entry: &WatchEntry, outcome: RowOutcome) {
        if let RowOutcome::Duplicate { kept_fact_id } = outcome {
            self.skipped.set(self.skipped.get() + 1);
            log::debug!("Skipped {}: kept fact #{}", entry.summary(), kept_fact_id);
        }
        if current.is_multiple_of(Self::EVERY) {
            let skipped = self.skipped.get();
            log::info!(
                "  [{}] {} imported, {} skipped",
                current,
                current - skipped,
                skipped
            );
        }
    }

    fn on_finish(&self, stats: &LegacyImportStats) {
        log::info!(
            "Imported {} of {} legacy facts ({} duplicates skipped)",
            stats.imported,
            stats.facts_read,
            stats.duplicates
        );
    }
}
