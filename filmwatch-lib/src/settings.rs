//! Shared application settings (database path, brand lexicon, defaults).
//!
//! The settings file is always `~/.config/filmwatch/settings.toml`:
//! ```toml
//! [database]
//! path = "/home/me/film_watches.db"
//!
//! [lexicon]
//! path = "/home/me/brands.yaml"
//!
//! [entry]
//! default_narrative = "Watch worn in film."
//! ```
//! Each value is resolved with the priority: command-line flag > environment
//! variable > settings file > built-in default.

use std::io;
use std::path::{Path, PathBuf};

use filmwatch_catalog::{BrandLexicon, DEFAULT_NARRATIVE, YamlError, load_lexicon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "FILMWATCH_DB";
/// Environment variable overriding the lexicon path.
pub const LEXICON_ENV: &str = "FILMWATCH_LEXICON";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Could not write settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("[{0}] in settings.toml is not a table")]
    NotATable(String),
}

/// Canonical path to the settings file: `~/.config/filmwatch/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("filmwatch").join("settings.toml")
}

/// Default database location: `<data dir>/filmwatch/film_watches.db`.
pub fn default_db_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("filmwatch").join("film_watches.db")
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    /// Passed on the command line.
    Flag,
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the settings file.
    ConfigFile,
    /// Built-in default.
    Default,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Provenance of each setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingSources {
    pub db_path: SettingSource,
    pub lexicon_path: SettingSource,
    pub default_narrative: SettingSource,
}

// ── File format ─────────────────────────────────────────────────────────────

/// TOML settings file format. Unknown keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<PathSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntrySection>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySection {
    pub default_narrative: Option<String>,
}

/// Read a settings file. A missing file is the same as an empty one.
pub fn load_settings_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SettingsFile::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

/// Set (or clear, with `None`) `[section] key` in the settings file.
///
/// Uses `toml::Value` for a surgical update so other keys are preserved,
/// and writes atomically through a temporary file. A settings file that does
/// not parse is left alone and reported as [`SettingsError::Parse`].
pub fn save_setting(
    path: &Path,
    section: &str,
    key: &str,
    value: Option<&str>,
) -> Result<(), SettingsError> {
    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Value::Table(Default::default()),
        Err(e) => return Err(e.into()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| SettingsError::NotATable("root".to_string()))?;
    let entry = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = entry
        .as_table_mut()
        .ok_or_else(|| SettingsError::NotATable(section.to_string()))?;

    match value {
        Some(v) => {
            section_table.insert(key.to_string(), toml::Value::String(v.to_string()));
        }
        None => {
            section_table.remove(key);
        }
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;

    log::debug!("Saved [{}] {} to {}", section, key, path.display());
    Ok(())
}

/// Save (or clear) the database path.
pub fn save_db_path(settings_file: &Path, db: Option<&Path>) -> Result<(), SettingsError> {
    let value = db.map(|p| p.to_string_lossy().into_owned());
    save_setting(settings_file, "database", "path", value.as_deref())
}

/// Save (or clear) the lexicon path.
pub fn save_lexicon_path(settings_file: &Path, lexicon: Option<&Path>) -> Result<(), SettingsError> {
    let value = lexicon.map(|p| p.to_string_lossy().into_owned());
    save_setting(settings_file, "lexicon", "path", value.as_deref())
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// Values given on the command line, which beat everything else.
#[derive(Debug, Default, Clone)]
pub struct SettingOverrides {
    pub db_path: Option<PathBuf>,
    pub lexicon_path: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    /// `None` means the built-in brand table.
    pub lexicon_path: Option<PathBuf>,
    pub default_narrative: String,
    pub sources: SettingSources,
}

impl Settings {
    /// Resolve settings from the real settings file and process environment.
    pub fn load(overrides: &SettingOverrides) -> Result<Self, SettingsError> {
        let file = load_settings_file(&settings_path())?;
        Ok(Self::resolve(overrides, &file, |var| std::env::var(var).ok()))
    }

    /// Resolve settings from explicit inputs. `env` looks up an environment
    /// variable; empty values count as unset.
    pub fn resolve(
        overrides: &SettingOverrides,
        file: &SettingsFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env = |var: &str| env(var).filter(|v| !v.trim().is_empty());

        let file_db = file.database.as_ref().and_then(|s| s.path.clone());
        let (db_path, db_source) = if let Some(p) = overrides.db_path.clone() {
            (p, SettingSource::Flag)
        } else if let Some(v) = env(DB_ENV) {
            (PathBuf::from(v), SettingSource::EnvVar(DB_ENV))
        } else if let Some(p) = file_db {
            (p, SettingSource::ConfigFile)
        } else {
            (default_db_path(), SettingSource::Default)
        };

        let file_lexicon = file.lexicon.as_ref().and_then(|s| s.path.clone());
        let (lexicon_path, lexicon_source) = if let Some(p) = overrides.lexicon_path.clone() {
            (Some(p), SettingSource::Flag)
        } else if let Some(v) = env(LEXICON_ENV) {
            (Some(PathBuf::from(v)), SettingSource::EnvVar(LEXICON_ENV))
        } else if let Some(p) = file_lexicon {
            (Some(p), SettingSource::ConfigFile)
        } else {
            (None, SettingSource::Default)
        };

        let file_narrative = file
            .entry
            .as_ref()
            .and_then(|s| s.default_narrative.clone())
            .filter(|n| !n.trim().is_empty());
        let (default_narrative, narrative_source) = match file_narrative {
            Some(n) => (n, SettingSource::ConfigFile),
            None => (DEFAULT_NARRATIVE.to_string(), SettingSource::Default),
        };

        Self {
            db_path,
            lexicon_path,
            default_narrative,
            sources: SettingSources {
                db_path: db_source,
                lexicon_path: lexicon_source,
                default_narrative: narrative_source,
            },
        }
    }

    /// Load the configured brand lexicon, or the built-in one.
    pub fn load_lexicon(&self) -> Result<BrandLexicon, YamlError> {
        match &self.lexicon_path {
            Some(path) => {
                let lexicon = load_lexicon(path)?;
                log::debug!("Loaded {} brands from {}", lexicon.len(), path.display());
                Ok(lexicon)
            }
            None => Ok(BrandLexicon::builtin()),
        }
    }
}
