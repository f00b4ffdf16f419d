//! filmwatch CLI
//!
//! Command-line interface for recording which watches actors wore in films.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;

use filmwatch_lib::{SettingOverrides, Settings};

use cli_types::{Cli, Commands, ConfigAction, LexiconAction};
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();

    let logger = match logging::CliLogger::new(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: cannot open log file: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = logger.install() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        log::logger().flush();
        std::process::exit(1);
    }
    log::logger().flush();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let overrides = SettingOverrides {
        db_path: cli.db,
        lexicon_path: cli.lexicon,
    };
    let settings = Settings::load(&overrides).map_err(|e| CliError::config(e.to_string()))?;
    log::debug!(
        "Database {} ({}), lexicon {:?} ({})",
        settings.db_path.display(),
        settings.sources.db_path,
        settings.lexicon_path,
        settings.sources.lexicon_path,
    );

    match cli.command {
        Commands::Parse { text, json } => {
            let lexicon = settings
                .load_lexicon()
                .map_err(|e| CliError::lexicon(e.to_string()))?;
            commands::entry::run_parse(&lexicon, &text, json)
        }
        Commands::Add { text, file, extras } => {
            let fw = commands::open_catalog(&settings)?;
            commands::entry::run_add(&fw, text.as_deref(), file.as_deref(), &extras)
        }
        Commands::Update {
            fact_id,
            text,
            extras,
        } => {
            let fw = commands::open_catalog(&settings)?;
            commands::entry::run_update(&fw, fact_id, &text, &extras)
        }
        Commands::Actor { name, json } => {
            let fw = commands::open_catalog(&settings)?;
            commands::query::run_actor(&fw, &name, json)
        }
        Commands::Brand { name, json } => {
            let fw = commands::open_catalog(&settings)?;
            commands::query::run_brand(&fw, &name, json)
        }
        Commands::Film { title, json } => {
            let fw = commands::open_catalog(&settings)?;
            commands::query::run_film(&fw, &title, json)
        }
        Commands::Stats { json } => {
            let fw = commands::open_catalog(&settings)?;
            commands::query::run_stats(&fw, json)
        }
        Commands::Similar { actor, film } => {
            let fw = commands::open_catalog(&settings)?;
            commands::query::run_similar(&fw, &actor, &film)
        }
        Commands::Admin { action } => {
            let fw = commands::open_catalog(&settings)?;
            commands::admin::run_admin(&fw, action)
        }
        Commands::ImportLegacy { path } => {
            let fw = commands::open_catalog(&settings)?;
            commands::import::run_import_legacy(&fw, &path, cli.quiet)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(&settings);
                Ok(())
            }
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::SetDb { path } => commands::config::run_config_set_db(path.as_deref()),
            ConfigAction::SetLexicon { path } => {
                commands::config::run_config_set_lexicon(path.as_deref())
            }
        },
        Commands::Lexicon { action } => match action {
            LexiconAction::Show => commands::lexicon::run_lexicon_show(&settings),
            LexiconAction::Export { path } => {
                commands::lexicon::run_lexicon_export(&settings, &path)
            }
        },
    }
}
