use filmwatch_catalog::{ParseError, YamlError};
use filmwatch_db::{OperationError, SchemaError};
use thiserror::Error;

use crate::settings::SettingsError;

/// Errors from the entry operations and from opening a catalog.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The text matched none of the sentence shapes
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The store rejected a read or write
    #[error("Storage error: {0}")]
    Storage(#[from] OperationError),

    /// The database could not be opened or migrated
    #[error("Database error: {0}")]
    Schema(#[from] SchemaError),

    /// A custom brand lexicon could not be loaded
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] YamlError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
