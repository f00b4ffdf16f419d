//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "filmwatch")]
#[command(about = "Record and look up watches worn by actors in films", long_about = None)]
pub(crate) struct Cli {
    /// Database file (overrides $FILMWATCH_DB and the settings file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Brand lexicon YAML file or directory (overrides $FILMWATCH_LEXICON)
    #[arg(long, global = true)]
    pub lexicon: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Optional values attached to a submitted entry.
#[derive(Args, Clone, Default)]
pub(crate) struct EntryExtras {
    /// Narrative describing how the watch appears (default: "Watch worn in film.")
    #[arg(long)]
    pub narrative: Option<String>,

    /// Reference URL backing up the identification
    #[arg(long)]
    pub source_url: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Parse a sentence and show the extracted fact without storing it
    Parse {
        /// e.g. "Daniel Craig wears an Omega Seamaster in Casino Royale (2006)"
        text: String,

        /// Print the parsed entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse and store a sighting
    Add {
        /// Sentence describing the sighting
        #[arg(required_unless_present = "file")]
        text: Option<String>,

        /// Read one sentence per line from a file (blank lines and '#' comments skipped)
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        #[command(flatten)]
        extras: EntryExtras,
    },

    /// Overwrite the watch, character and narrative of an existing fact
    Update {
        /// Fact id, as shown by `add` when it reports a duplicate
        fact_id: i64,

        /// Sentence describing the corrected sighting
        text: String,

        #[command(flatten)]
        extras: EntryExtras,
    },

    /// Find facts by actor name (substring, case-insensitive)
    Actor {
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Find facts by watch brand (substring, case-insensitive)
    Brand {
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Find facts by film title (substring, case-insensitive)
    Film {
        title: String,
        #[arg(long)]
        json: bool,
    },

    /// Show catalog totals and the most-sighted brands
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// List facts whose actor and film both match, to spot near-duplicates
    Similar { actor: String, film: String },

    /// Clean-up operations on stored data
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Import facts from a database written by the old plugin
    ImportLegacy {
        /// Path to the legacy SQLite file (opened read-only)
        path: PathBuf,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Inspect the active brand lexicon
    Lexicon {
        #[command(subcommand)]
        action: LexiconAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum AdminAction {
    /// Delete one fact
    DeleteEntry { fact_id: i64 },

    /// Delete a brand that no watch uses
    DeleteBrand { brand_id: i64 },

    /// Merge actor rows whose names differ only by case or surrounding spaces
    MergeActors,

    /// Merge character rows with identical names
    MergeCharacters,

    /// Re-split watches whose brand was stored as "a" or "an"
    FixBrands,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where each value came from
    Show,

    /// Print the settings file path
    Path,

    /// Set the database path (omit PATH to clear)
    SetDb { path: Option<PathBuf> },

    /// Set the brand lexicon path (omit PATH to clear)
    SetLexicon { path: Option<PathBuf> },
}

#[derive(Subcommand)]
pub(crate) enum LexiconAction {
    /// List brands in priority order
    Show,

    /// Write the active lexicon to a YAML file
    Export { path: PathBuf },
}
