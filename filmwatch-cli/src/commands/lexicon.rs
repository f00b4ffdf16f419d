use std::path::Path;

use filmwatch_catalog::save_lexicon;
use filmwatch_lib::Settings;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

pub(crate) fn run_lexicon_show(settings: &Settings) -> Result<(), CliError> {
    let lexicon = settings
        .load_lexicon()
        .map_err(|e| CliError::lexicon(e.to_string()))?;

    let origin = settings
        .lexicon_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    log::info!(
        "{} brands from {}",
        lexicon.len().if_supports_color(Stdout, |t| t.bold()),
        origin,
    );
    for (i, brand) in lexicon.brands().iter().enumerate() {
        log::info!("  {:>3}. {}", i + 1, brand);
    }
    Ok(())
}

pub(crate) fn run_lexicon_export(settings: &Settings, path: &Path) -> Result<(), CliError> {
    let lexicon = settings
        .load_lexicon()
        .map_err(|e| CliError::lexicon(e.to_string()))?;
    save_lexicon(path, &lexicon).map_err(|e| CliError::lexicon(e.to_string()))?;
    log::info!(
        "{} Wrote {} brands to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        lexicon.len(),
        path.display(),
    );
    Ok(())
}
