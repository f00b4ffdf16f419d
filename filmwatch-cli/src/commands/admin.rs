use filmwatch_db::{
    MergeStats, delete_brand, delete_entry, fix_article_brands, get_fact, merge_duplicate_actors,
    merge_duplicate_characters,
};
use filmwatch_lib::FilmWatch;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::AdminAction;

pub(crate) fn run_admin(fw: &FilmWatch, action: AdminAction) -> Result<(), CliError> {
    let conn = fw.connection();
    match action {
        AdminAction::DeleteEntry { fact_id } => {
            let summary = get_fact(conn, fact_id)
                .map_err(|e| CliError::database(e.to_string()))?
                .map(|f| f.summary());
            delete_entry(conn, fact_id).map_err(|e| CliError::database(e.to_string()))?;
            log::info!(
                "{} Deleted fact #{}{}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                fact_id,
                summary.map(|s| format!(": {}", s)).unwrap_or_default(),
            );
        }
        AdminAction::DeleteBrand { brand_id } => {
            delete_brand(conn, brand_id).map_err(|e| CliError::database(e.to_string()))?;
            log::info!(
                "{} Deleted brand #{}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                brand_id,
            );
        }
        AdminAction::MergeActors => {
            let stats = merge_duplicate_actors(conn)
                .map_err(|e| CliError::database(format!("Failed to merge actors: {}", e)))?;
            log_merge("actor", &stats);
        }
        AdminAction::MergeCharacters => {
            let stats = merge_duplicate_characters(conn)
                .map_err(|e| CliError::database(format!("Failed to merge characters: {}", e)))?;
            log_merge("character", &stats);
        }
        AdminAction::FixBrands => {
            let fixed = fix_article_brands(conn)
                .map_err(|e| CliError::database(format!("Failed to fix brands: {}", e)))?;
            if fixed == 0 {
                log::info!("No watches with an article as brand");
            } else {
                log::info!(
                    "{} Re-split {} watches",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    fixed,
                );
            }
        }
    }
    Ok(())
}

fn log_merge(kind: &str, stats: &MergeStats) {
    if stats.groups == 0 {
        log::info!("No duplicate {} names found", kind);
        return;
    }
    log::info!(
        "{} Merged {} {} rows across {} names",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        stats.merged,
        kind,
        stats.groups,
    );
    if stats.conflicts > 0 {
        log::warn!(
            "{} facts left in place: merging them would give an actor two facts for one film",
            stats.conflicts,
        );
    }
}
