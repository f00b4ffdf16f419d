//! Film watch data model, brand lexicon, and free-text entry parsing.
//!
//! This crate has no database dependency. It turns a sentence such as
//! "Daniel Craig wears an Omega Seamaster in Casino Royale (2006)" into a
//! [`WatchEntry`], and defines the record types that `filmwatch-db` reads
//! back out of the store.

pub mod entry_parser;
pub mod lexicon;
pub mod types;
pub mod yaml;

pub use entry_parser::{ParseError, parse_entry, parse_entry_with, split_watch_phrase};
pub use lexicon::{Attribution, BUILTIN_BRANDS, BrandLexicon};
pub use types::*;
pub use yaml::{YamlError, load_lexicon, save_lexicon};
