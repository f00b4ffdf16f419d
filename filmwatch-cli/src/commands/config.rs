use std::path::{Path, PathBuf};

use filmwatch_catalog::load_lexicon;
use filmwatch_lib::settings::{
    load_settings_string, save_db_path, save_lexicon_path, settings_path,
};
use filmwatch_lib::{SettingSource, Settings};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

fn log_setting(name: &str, value: &str, source: SettingSource) {
    log::info!(
        "  {} {} {}",
        format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
        value,
        format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
    );
}

/// Show resolved settings and their sources.
pub(crate) fn run_config_show(settings: &Settings) {
    let path = settings_path();

    log::info!(
        "{}",
        "Film Watch Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    log_setting(
        "database",
        &settings.db_path.display().to_string(),
        settings.sources.db_path,
    );
    let lexicon = settings
        .lexicon_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    log_setting("lexicon", &lexicon, settings.sources.lexicon_path);
    log_setting(
        "default_narrative",
        &settings.default_narrative,
        settings.sources.default_narrative,
    );

    if let Some(contents) = load_settings_string(&path) {
        log::debug!("settings.toml:\n{}", contents.trim_end());
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

fn absolute(path: &Path) -> Result<PathBuf, CliError> {
    std::path::absolute(path)
        .map_err(|e| CliError::config(format!("Invalid path {}: {}", path.display(), e)))
}

/// Save (or clear) the database path.
pub(crate) fn run_config_set_db(path: Option<&Path>) -> Result<(), CliError> {
    let settings_file = settings_path();
    let db = path.map(absolute).transpose()?;
    save_db_path(&settings_file, db.as_deref())
        .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;

    match db {
        Some(p) => log::info!(
            "{} Database set to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            p.display(),
        ),
        None => log::info!(
            "{} Database path cleared (using default)",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        ),
    }
    Ok(())
}

/// Save (or clear) the lexicon path. The lexicon must load before it is saved.
pub(crate) fn run_config_set_lexicon(path: Option<&Path>) -> Result<(), CliError> {
    let settings_file = settings_path();
    let lexicon_path = path.map(absolute).transpose()?;

    if let Some(p) = &lexicon_path {
        let lexicon = load_lexicon(p).map_err(|e| CliError::lexicon(e.to_string()))?;
        if lexicon.is_empty() {
            log::warn!("{} contains no brands", p.display());
        }
    }

    save_lexicon_path(&settings_file, lexicon_path.as_deref())
        .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;

    match lexicon_path {
        Some(p) => log::info!(
            "{} Lexicon set to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            p.display(),
        ),
        None => log::info!(
            "{} Lexicon path cleared (using built-in brands)",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        ),
    }
    Ok(())
}
