//! SQLite persistence layer for the film watch catalog.
//!
//! Provides schema creation, the fact repository with its one-fact-per-
//! (film, actor) rule, read queries, admin clean-ups, and legacy import,
//! backed by SQLite (via rusqlite with bundled feature).

pub mod legacy;
pub mod maintenance;
pub mod operations;
pub mod progress;
pub mod queries;
pub mod repository;
pub mod schema;

pub use legacy::{LegacyImportStats, import_legacy};
pub use maintenance::{
    MergeStats, delete_brand, delete_entry, fix_article_brands, merge_duplicate_actors,
    merge_duplicate_characters,
};
pub use operations::{OperationError, get_fact};
pub use progress::{ImportProgress, LogProgress, RowOutcome, SilentProgress};
pub use queries::{find_similar, get_stats, query_actor, query_brand, query_film};
pub use repository::{FactRepository, InsertOutcome};
pub use schema::{SchemaError, open_database, open_memory};
