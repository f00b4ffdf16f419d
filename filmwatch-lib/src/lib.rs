//! Film watch catalog operations and shared settings.
//!
//! [`FilmWatch`] ties the entry parser to the SQLite store; [`settings`]
//! resolves where the database and brand lexicon live.

pub mod error;
pub mod service;
pub mod settings;

pub use error::EntryError;
pub use filmwatch_db::InsertOutcome;
pub use service::FilmWatch;
pub use settings::{SettingOverrides, SettingSource, Settings, SettingsError};
