use filmwatch_catalog::{BrandLexicon, YamlError, load_lexicon, parse_entry_with, save_lexicon};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_yaml(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn load_lexicon_from_file() {
    let tmp = TempDir::new().unwrap();
    write_yaml(
        tmp.path(),
        "brands.yaml",
        r#"
- Vostok
- Raketa
- Poljot
"#,
    );

    let lexicon = load_lexicon(&tmp.path().join("brands.yaml")).unwrap();
    assert_eq!(lexicon.len(), 3);
    assert_eq!(lexicon.brands()[0], "Vostok");
    assert_eq!(lexicon.brands()[2], "Poljot");
}

#[test]
fn load_lexicon_from_directory_in_file_order() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "20-swiss.yaml", "- Rolex\n- Omega\n");
    write_yaml(tmp.path(), "10-russian.yml", "- Vostok\n");
    write_yaml(tmp.path(), "notes.txt", "not a lexicon");

    let lexicon = load_lexicon(tmp.path()).unwrap();
    assert_eq!(
        lexicon.brands(),
        &["Vostok".to_string(), "Rolex".to_string(), "Omega".to_string()]
    );
}

#[test]
fn empty_file_gives_empty_lexicon() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "empty.yaml", "\n");

    let lexicon = load_lexicon(&tmp.path().join("empty.yaml")).unwrap();
    assert!(lexicon.is_empty());
}

#[test]
fn duplicates_across_files_collapse() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "a.yaml", "- Rolex\n");
    write_yaml(tmp.path(), "b.yaml", "- ROLEX\n- Tudor\n");

    let lexicon = load_lexicon(tmp.path()).unwrap();
    assert_eq!(lexicon.brands(), &["Rolex".to_string(), "Tudor".to_string()]);
}

#[test]
fn missing_path_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = load_lexicon(&tmp.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, YamlError::NotFound(_)));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "bad.yaml", "brands: {rolex: [");

    let err = load_lexicon(&tmp.path().join("bad.yaml")).unwrap_err();
    assert!(matches!(err, YamlError::Parse { .. }));
}

#[test]
fn save_then_load_preserves_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("brands.yaml");
    let lexicon = BrandLexicon::new(["Jaeger-LeCoultre", "A. Lange & Söhne", "Sinn"]);

    save_lexicon(&path, &lexicon).unwrap();
    let loaded = load_lexicon(&path).unwrap();
    assert_eq!(loaded, lexicon);
}

#[test]
fn loaded_lexicon_drives_the_parser() {
    let tmp = TempDir::new().unwrap();
    write_yaml(tmp.path(), "brands.yaml", "- Vostok\n- Vostok Europe\n");

    let lexicon = load_lexicon(&tmp.path().join("brands.yaml")).unwrap();
    let e = parse_entry_with(
        "Someone wears a Vostok Europe Anchar in Leviathan (2014)",
        &lexicon,
    )
    .unwrap();
    assert_eq!(e.brand, "Vostok Europe");
    assert_eq!(e.model, "Anchar");
}
