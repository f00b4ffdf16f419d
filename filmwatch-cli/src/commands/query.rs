use filmwatch_catalog::types::FactRecord;
use filmwatch_lib::FilmWatch;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{log_fact, print_json};

fn log_results(kind: &str, term: &str, facts: &[FactRecord]) {
    let noun = if facts.len() == 1 { "fact" } else { "facts" };
    log::info!(
        "{} {} for {} matching '{}'",
        facts.len().if_supports_color(Stdout, |t| t.bold()),
        noun,
        kind,
        term,
    );
    for fact in facts {
        crate::log_blank();
        log_fact(fact);
    }
}

pub(crate) fn run_actor(fw: &FilmWatch, name: &str, json: bool) -> Result<(), CliError> {
    let result = fw.query_actor(name)?;
    if json {
        return print_json(&result);
    }
    log_results("actors", name, &result.films);
    Ok(())
}

pub(crate) fn run_brand(fw: &FilmWatch, name: &str, json: bool) -> Result<(), CliError> {
    let result = fw.query_brand(name)?;
    if json {
        return print_json(&result);
    }
    log_results("brands", name, &result.films);
    Ok(())
}

pub(crate) fn run_film(fw: &FilmWatch, title: &str, json: bool) -> Result<(), CliError> {
    let result = fw.query_film(title)?;
    if json {
        return print_json(&result);
    }
    log_results("films", title, &result.watches);
    Ok(())
}

pub(crate) fn run_stats(fw: &FilmWatch, json: bool) -> Result<(), CliError> {
    let stats = fw.get_stats()?;
    if json {
        return print_json(&stats);
    }

    log::info!(
        "{}",
        "Film Watch Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    log::info!("  Films:    {:>8}", stats.films);
    log::info!("  Actors:   {:>8}", stats.actors);
    log::info!("  Brands:   {:>8}", stats.brands);
    log::info!("  Entries:  {:>8}", stats.entries);

    if !stats.top_brands.is_empty() {
        crate::log_blank();
        log::info!("{}", "Top brands".if_supports_color(Stdout, |t| t.bold()));
        for (rank, brand) in stats.top_brands.iter().enumerate() {
            log::info!("  {:>2}. {:<24} {:>6}", rank + 1, brand.brand, brand.count);
        }
    }
    Ok(())
}

pub(crate) fn run_similar(fw: &FilmWatch, actor: &str, film: &str) -> Result<(), CliError> {
    let facts = fw.find_similar(actor, film)?;
    if facts.is_empty() {
        log::info!("No facts match actor '{}' in film '{}'", actor, film);
        return Ok(());
    }
    log::info!(
        "{} possible matches for actor '{}' in film '{}'",
        facts.len().if_supports_color(Stdout, |t| t.bold()),
        actor,
        film,
    );
    for fact in &facts {
        crate::log_blank();
        log_fact(fact);
    }
    Ok(())
}
