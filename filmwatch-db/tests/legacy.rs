use std::cell::RefCell;
use std::path::Path;

use filmwatch_catalog::types::{CharacterSource, DEFAULT_NARRATIVE, VerificationLevel, WatchEntry};
use filmwatch_db::legacy::read_legacy_entries;
use filmwatch_db::*;
use rusqlite::Connection;
use tempfile::TempDir;

/// Build a database in the old plugin's shape, where the fact table is keyed
/// on the whole (film, actor, character, watch) tuple.
fn write_legacy_db(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE films (film_id INTEGER PRIMARY KEY AUTOINCREMENT,
             title VARCHAR(255) NOT NULL, year INTEGER NOT NULL, UNIQUE(title, year));
         CREATE TABLE brands (brand_id INTEGER PRIMARY KEY AUTOINCREMENT,
             brand_name VARCHAR(100) NOT NULL UNIQUE);
         CREATE TABLE watches (watch_id INTEGER PRIMARY KEY AUTOINCREMENT,
             brand_id INTEGER NOT NULL, model_reference VARCHAR(255) NOT NULL,
             verification_level VARCHAR(50), UNIQUE(brand_id, model_reference));
         CREATE TABLE actors (actor_id INTEGER PRIMARY KEY AUTOINCREMENT,
             actor_name VARCHAR(255) NOT NULL UNIQUE);
         CREATE TABLE characters (character_id INTEGER PRIMARY KEY AUTOINCREMENT,
             character_name VARCHAR(255) NOT NULL);
         CREATE TABLE film_actor_watch (faw_id INTEGER PRIMARY KEY AUTOINCREMENT,
             film_id INTEGER NOT NULL, actor_id INTEGER NOT NULL,
             character_id INTEGER NOT NULL, watch_id INTEGER NOT NULL,
             narrative_role TEXT,
             UNIQUE(film_id, actor_id, character_id, watch_id));

         INSERT INTO films (title, year) VALUES ('Dr. No', 1962), ('Goldfinger', 1964);
         INSERT INTO brands (brand_name) VALUES ('Rolex'), ('Gruen');
         INSERT INTO watches (brand_id, model_reference, verification_level)
             VALUES (1, 'Submariner', 'Confirmed'), (2, 'Precision', NULL);
         INSERT INTO actors (actor_name) VALUES ('Sean Connery'), ('Gert Frobe');
         INSERT INTO characters (character_name) VALUES ('James Bond'), ('Auric Goldfinger');
         INSERT INTO film_actor_watch (film_id, actor_id, character_id, watch_id, narrative_role)
             VALUES (1, 1, 1, 1, 'Worn throughout.'),
                    (1, 1, 1, 2, 'Second watch in the same film.'),
                    (2, 1, 1, 1, NULL),
                    (2, 2, 2, 1, '');",
    )
    .unwrap();
}

#[test]
fn read_denormalizes_in_id_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.db");
    write_legacy_db(&path);

    let entries = read_legacy_entries(&path).unwrap();
    assert_eq!(entries.len(), 4);

    let first = &entries[0];
    assert_eq!(first.title, "Dr. No");
    assert_eq!(first.actor, "Sean Connery");
    assert_eq!(first.character, "James Bond");
    assert_eq!(first.character_source, CharacterSource::Explicit);
    assert_eq!(first.brand, "Rolex");
    assert_eq!(first.model, "Submariner");
    assert_eq!(first.verification, VerificationLevel::Confirmed);
    assert_eq!(first.narrative, "Worn throughout.");
    assert!(first.source_url.is_none());

    assert_eq!(entries[1].verification, VerificationLevel::Unconfirmed);
    assert_eq!(entries[2].narrative, DEFAULT_NARRATIVE);
    assert_eq!(entries[3].narrative, DEFAULT_NARRATIVE);
}

#[test]
fn import_keeps_first_fact_per_pair() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.db");
    write_legacy_db(&path);

    let conn = open_memory().unwrap();
    let stats = import_legacy(&conn, &path, None).unwrap();
    assert_eq!(
        stats,
        LegacyImportStats {
            facts_read: 4,
            imported: 3,
            duplicates: 1,
        }
    );

    let dr_no = query_film(&conn, "Dr. No").unwrap();
    assert_eq!(dr_no.count, 1);
    assert_eq!(dr_no.watches[0].model, "Submariner");
    assert_eq!(query_film(&conn, "Goldfinger").unwrap().count, 2);
}

#[test]
fn import_is_repeatable() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.db");
    write_legacy_db(&path);

    let conn = open_memory().unwrap();
    import_legacy(&conn, &path, Some(&SilentProgress)).unwrap();
    let again = import_legacy(&conn, &path, Some(&SilentProgress)).unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(again.duplicates, 4);
    assert_eq!(get_stats(&conn).unwrap().entries, 3);
}

#[derive(Default)]
struct Recorder {
    started: RefCell<Option<usize>>,
    rows: RefCell<Vec<(usize, String, RowOutcome)>>,
    finished: RefCell<Option<LegacyImportStats>>,
}

impl ImportProgress for Recorder {
    fn on_start(&self, _source: &Path, total: usize) {
        *self.started.borrow_mut() = Some(total);
    }
    fn on_row(&self, current: usize, entry: &WatchEntry, outcome: RowOutcome) {
        self.rows
            .borrow_mut()
            .push((current, entry.model.clone(), outcome));
    }
    fn on_finish(&self, stats: &LegacyImportStats) {
        *self.finished.borrow_mut() = Some(stats.clone());
    }
}

#[test]
fn import_reports_each_row_outcome() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.db");
    write_legacy_db(&path);

    let conn = open_memory().unwrap();
    let recorder = Recorder::default();
    let stats = import_legacy(&conn, &path, Some(&recorder)).unwrap();

    assert_eq!(*recorder.started.borrow(), Some(4));
    let rows = recorder.rows.borrow();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows.iter().map(|(i, _, _)| *i).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let RowOutcome::Imported { fact_id: kept } = rows[0].2 else {
        panic!("first row should be imported");
    };
    // The Gruen row collides with the Submariner fact for Dr. No.
    assert_eq!(rows[1].1, "Precision");
    assert_eq!(rows[1].2, RowOutcome::Duplicate { kept_fact_id: kept });
    assert!(!rows[2].2.is_duplicate());
    assert!(!rows[3].2.is_duplicate());

    assert_eq!(recorder.finished.borrow().as_ref(), Some(&stats));
}

#[test]
fn log_progress_counts_skipped_rows() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.db");
    write_legacy_db(&path);

    let conn = open_memory().unwrap();
    let progress = LogProgress::default();
    import_legacy(&conn, &path, Some(&progress)).unwrap();
    assert_eq!(progress.skipped(), 1);

    // A second run starts its count over and skips everything.
    import_legacy(&conn, &path, Some(&progress)).unwrap();
    assert_eq!(progress.skipped(), 4);
}

#[test]
fn missing_fact_table_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER);")
        .unwrap();

    let conn = open_memory().unwrap();
    let err = import_legacy(&conn, &path, None).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn legacy_file_is_rejected_by_open_then_imported() {
    let tmp = TempDir::new().unwrap();
    let legacy = tmp.path().join("legacy.db");
    write_legacy_db(&legacy);
    assert!(matches!(
        open_database(&legacy),
        Err(SchemaError::LegacyDatabase)
    ));

    let conn = open_database(&tmp.path().join("new.db")).unwrap();
    let stats = import_legacy(&conn, &legacy, Some(&LogProgress::default())).unwrap();
    assert_eq!(stats.imported, 3);
}
