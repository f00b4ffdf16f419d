use std::path::PathBuf;

use filmwatch_catalog::types::DEFAULT_NARRATIVE;
use filmwatch_catalog::save_lexicon;
use filmwatch_catalog::BrandLexicon;
use filmwatch_lib::settings::*;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

fn file_with_everything() -> SettingsFile {
    SettingsFile {
        database: Some(PathSection {
            path: Some(PathBuf::from("/from/file.db")),
        }),
        lexicon: Some(PathSection {
            path: Some(PathBuf::from("/from/file.yaml")),
        }),
        entry: Some(EntrySection {
            default_narrative: Some("From the file.".to_string()),
        }),
    }
}

#[test]
fn defaults_when_nothing_is_set() {
    let settings = Settings::resolve(&SettingOverrides::default(), &SettingsFile::default(), no_env);
    assert_eq!(settings.db_path, default_db_path());
    assert!(settings.lexicon_path.is_none());
    assert_eq!(settings.default_narrative, DEFAULT_NARRATIVE);
    assert_eq!(settings.sources.db_path, SettingSource::Default);
    assert_eq!(settings.sources.lexicon_path, SettingSource::Default);
    assert_eq!(settings.sources.default_narrative, SettingSource::Default);
}

#[test]
fn file_beats_default() {
    let settings = Settings::resolve(&SettingOverrides::default(), &file_with_everything(), no_env);
    assert_eq!(settings.db_path, PathBuf::from("/from/file.db"));
    assert_eq!(settings.lexicon_path, Some(PathBuf::from("/from/file.yaml")));
    assert_eq!(settings.default_narrative, "From the file.");
    assert_eq!(settings.sources.db_path, SettingSource::ConfigFile);
    assert_eq!(settings.sources.default_narrative, SettingSource::ConfigFile);
}

#[test]
fn env_beats_file() {
    let env = |var: &str| match var {
        DB_ENV => Some("/from/env.db".to_string()),
        LEXICON_ENV => Some("/from/env.yaml".to_string()),
        _ => None,
    };
    let settings = Settings::resolve(&SettingOverrides::default(), &file_with_everything(), env);
    assert_eq!(settings.db_path, PathBuf::from("/from/env.db"));
    assert_eq!(settings.lexicon_path, Some(PathBuf::from("/from/env.yaml")));
    assert_eq!(settings.sources.db_path, SettingSource::EnvVar(DB_ENV));
    assert_eq!(settings.sources.lexicon_path, SettingSource::EnvVar(LEXICON_ENV));
}

#[test]
fn flag_beats_env() {
    let env = |var: &str| (var == DB_ENV).then(|| "/from/env.db".to_string());
    let overrides = SettingOverrides {
        db_path: Some(PathBuf::from("/from/flag.db")),
        lexicon_path: None,
    };
    let settings = Settings::resolve(&overrides, &file_with_everything(), env);
    assert_eq!(settings.db_path, PathBuf::from("/from/flag.db"));
    assert_eq!(settings.sources.db_path, SettingSource::Flag);
    // Not overridden on the command line, so the file still wins.
    assert_eq!(settings.sources.lexicon_path, SettingSource::ConfigFile);
}

#[test]
fn empty_env_counts_as_unset() {
    let env = |_: &str| Some("  ".to_string());
    let settings = Settings::resolve(&SettingOverrides::default(), &file_with_everything(), env);
    assert_eq!(settings.sources.db_path, SettingSource::ConfigFile);
    assert_eq!(settings.sources.lexicon_path, SettingSource::ConfigFile);
}

#[test]
fn source_display() {
    assert_eq!(SettingSource::Flag.to_string(), "command line");
    assert_eq!(SettingSource::EnvVar(DB_ENV).to_string(), "env $FILMWATCH_DB");
    assert_eq!(SettingSource::ConfigFile.to_string(), "config file");
    assert_eq!(SettingSource::Default.to_string(), "default");
}

#[test]
fn missing_file_is_empty() {
    let tmp = TempDir::new().unwrap();
    let file = load_settings_file(&tmp.path().join("settings.toml")).unwrap();
    assert_eq!(file, SettingsFile::default());
}

#[test]
fn parse_settings_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[database]
path = "/data/watches.db"

[entry]
default_narrative = "Spotted."

[unrelated]
key = 1
"#,
    )
    .unwrap();

    let file = load_settings_file(&path).unwrap();
    assert_eq!(
        file.database.unwrap().path,
        Some(PathBuf::from("/data/watches.db"))
    );
    assert!(file.lexicon.is_none());
    assert_eq!(file.entry.unwrap().default_narrative.as_deref(), Some("Spotted."));
}

#[test]
fn invalid_settings_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.toml");
    std::fs::write(&path, "[database\npath = ").unwrap();
    assert!(matches!(
        load_settings_file(&path),
        Err(SettingsError::Parse { .. })
    ));
}

#[test]
fn save_setting_preserves_other_keys() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config").join("settings.toml");

    save_setting(&path, "entry", "default_narrative", Some("Spotted.")).unwrap();
    save_db_path(&path, Some(&PathBuf::from("/data/watches.db"))).unwrap();

    let file = load_settings_file(&path).unwrap();
    assert_eq!(
        file.database.as_ref().unwrap().path,
        Some(PathBuf::from("/data/watches.db"))
    );
    assert_eq!(
        file.entry.as_ref().unwrap().default_narrative.as_deref(),
        Some("Spotted.")
    );
    assert!(!path.with_extension("toml.tmp").exists());

    let shown = load_settings_string(&path).unwrap();
    assert!(shown.contains("default_narrative"));
}

#[test]
fn save_none_clears_key() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.toml");
    save_lexicon_path(&path, Some(&PathBuf::from("/brands.yaml"))).unwrap();
    save_lexicon_path(&path, None).unwrap();

    let file = load_settings_file(&path).unwrap();
    assert!(file.lexicon.unwrap().path.is_none());
}

#[test]
fn save_refuses_to_overwrite_invalid_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.toml");
    let broken = "[lexicon]\npath = \"/brands.yaml\"\n[database\n";
    std::fs::write(&path, broken).unwrap();

    assert!(matches!(
        save_db_path(&path, Some(&PathBuf::from("/x.db"))),
        Err(SettingsError::Parse { .. })
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
}

#[test]
fn save_into_non_table_section_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.toml");
    std::fs::write(&path, "database = \"oops\"\n").unwrap();
    assert!(matches!(
        save_db_path(&path, Some(&PathBuf::from("/x.db"))),
        Err(SettingsError::NotATable(section)) if section == "database"
    ));
}

#[test]
fn load_lexicon_from_settings() {
    let tmp = TempDir::new().unwrap();
    let yaml = tmp.path().join("brands.yaml");
    save_lexicon(&yaml, &BrandLexicon::new(["Vostok Europe", "Raketa"])).unwrap();

    let overrides = SettingOverrides {
        db_path: None,
        lexicon_path: Some(yaml),
    };
    let settings = Settings::resolve(&overrides, &SettingsFile::default(), no_env);
    let lexicon = settings.load_lexicon().unwrap();
    assert_eq!(lexicon.brands(), ["Vostok Europe", "Raketa"]);

    let builtin = Settings::resolve(&SettingOverrides::default(), &SettingsFile::default(), no_env)
        .load_lexicon()
        .unwrap();
    assert_eq!(builtin.len(), BrandLexicon::builtin().len());
}
