use filmwatch_catalog::entry_parser::{ParseError, parse_entry, parse_entry_with, split_watch_phrase};
use filmwatch_catalog::lexicon::BrandLexicon;
use filmwatch_catalog::types::{CharacterSource, DEFAULT_NARRATIVE, VerificationLevel};

#[test]
fn year_before_title() {
    let e = parse_entry("Sean Connery wears a Rolex Submariner watch in the 1962 film Dr. No").unwrap();
    assert_eq!(e.actor, "Sean Connery");
    assert_eq!(e.brand, "Rolex");
    assert_eq!(e.model, "Submariner");
    assert_eq!(e.year, 1962);
    assert_eq!(e.title, "Dr. No");
}

#[test]
fn year_before_title_without_filler_word() {
    let e = parse_entry("Pierce Brosnan wore an Omega Seamaster in 1995 GoldenEye").unwrap();
    assert_eq!(e.actor, "Pierce Brosnan");
    assert_eq!(e.year, 1995);
    assert_eq!(e.title, "GoldenEye");
}

#[test]
fn year_before_title_with_movie_keyword() {
    let e = parse_entry("Steve McQueen wearing a Heuer Monaco in the movie 1971 Le Mans").unwrap();
    assert_eq!(e.brand, "Heuer");
    assert_eq!(e.model, "Monaco");
    assert_eq!(e.year, 1971);
    // The single optional filler word eats "Le"; titles are not disambiguated.
    assert_eq!(e.title, "Mans");
}

#[test]
fn title_then_year() {
    let e = parse_entry("Daniel Craig wears an Omega Seamaster in Casino Royale (2006).").unwrap();
    assert_eq!(e.actor, "Daniel Craig");
    assert_eq!(e.brand, "Omega");
    assert_eq!(e.model, "Seamaster");
    assert_eq!(e.title, "Casino Royale");
    assert_eq!(e.year, 2006);
}

#[test]
fn title_then_year_keeps_leading_the() {
    let e = parse_entry("Steve McQueen wears a Patek Philippe Ref. 3466 in The Thomas Crown Affair (1968)")
        .unwrap();
    assert_eq!(e.brand, "Patek Philippe");
    assert_eq!(e.model, "Ref. 3466");
    assert_eq!(e.title, "The Thomas Crown Affair");
}

#[test]
fn title_then_year_strips_the_movie() {
    let e = parse_entry("Tom Cruise wears a Breitling in the movie Top Gun (1986)").unwrap();
    assert_eq!(e.title, "Top Gun");
}

#[test]
fn title_containing_in() {
    let e = parse_entry("Brad Pitt wears a Hamilton Khaki in Once Upon a Time in Hollywood (2019)").unwrap();
    assert_eq!(e.brand, "Hamilton");
    assert_eq!(e.model, "Khaki");
    assert_eq!(e.title, "Once Upon a Time in Hollywood");
}

#[test]
fn film_first_with_character() {
    let e = parse_entry("In Goldfinger (1964), Sean Connery as James Bond wears a Rolex Submariner").unwrap();
    assert_eq!(e.title, "Goldfinger");
    assert_eq!(e.year, 1964);
    assert_eq!(e.actor, "Sean Connery");
    assert_eq!(e.character, "James Bond");
    assert_eq!(e.character_source, CharacterSource::Explicit);
    assert_eq!(e.brand, "Rolex");
    assert_eq!(e.model, "Submariner");
}

#[test]
fn film_first_with_plays() {
    let e = parse_entry("in Tenet (2020), John David Washington plays The Protagonist wearing a Casio G-Shock")
        .unwrap();
    assert_eq!(e.actor, "John David Washington");
    assert_eq!(e.character, "The Protagonist");
    assert_eq!(e.brand, "Casio");
    assert_eq!(e.model, "G-Shock");
}

#[test]
fn case_insensitive_templates() {
    let e = parse_entry("KEANU REEVES WEARS A SEIKO 5 IN JOHN WICK (2014)").unwrap();
    assert_eq!(e.actor, "KEANU REEVES");
    assert_eq!(e.brand, "Seiko");
    assert_eq!(e.model, "5");
    assert_eq!(e.title, "JOHN WICK");
}

#[test]
fn template_one_wins_when_both_shapes_match() {
    let e = parse_entry("Sean Connery wears a Rolex Submariner in the 1964 film Goldfinger (1964)").unwrap();
    assert_eq!(e.year, 1964);
    assert_eq!(e.title, "Goldfinger (1964)");
}

#[test]
fn by_clause_beats_prefix_and_split() {
    let e = parse_entry("Someone wears a vintage diver by Omega in Goldfinger (1964)").unwrap();
    assert_eq!(e.brand, "Omega");
    assert_eq!(e.model, "a vintage diver");
}

#[test]
fn from_clause_attribution() {
    let e = parse_entry("Ryan Gosling wears a chronograph from Rolex in Drive (2011)").unwrap();
    assert_eq!(e.brand, "Rolex");
    assert_eq!(e.model, "a chronograph");
}

#[test]
fn longest_brand_wins() {
    let e = parse_entry("Christian Bale wears Jaeger-LeCoultre Reverso in American Psycho (2000)").unwrap();
    assert_eq!(e.brand, "Jaeger-LeCoultre");
    assert_eq!(e.model, "Reverso");

    let e = parse_entry("Someone wears an IWC Schaffhausen Big Pilot in Heat (1995)").unwrap();
    assert_eq!(e.brand, "IWC Schaffhausen");
    assert_eq!(e.model, "Big Pilot");
}

#[test]
fn unknown_brand_splits_first_word() {
    let e = parse_entry("Someone wears a Vostok Amphibia in Leviathan (2014)").unwrap();
    assert_eq!(e.brand, "Vostok");
    assert_eq!(e.model, "Amphibia");
}

#[test]
fn single_word_unknown_watch() {
    let e = parse_entry("Someone wears a Raketa in Leviathan (2014)").unwrap();
    assert_eq!(e.brand, "Raketa");
    assert_eq!(e.model, "Raketa");
}

#[test]
fn article_is_never_a_brand() {
    let e = parse_entry("Someone wears a Vostok Amphibia in Leviathan (2014)").unwrap();
    assert_ne!(e.brand.to_lowercase(), "a");
}

#[test]
fn actor_clause_sets_character() {
    let e = parse_entry("Sean Connery as James Bond wears a Rolex Submariner in Dr. No (1962)").unwrap();
    assert_eq!(e.actor, "Sean Connery");
    assert_eq!(e.character, "James Bond");
    assert_eq!(e.character_source, CharacterSource::ActorClause);
}

#[test]
fn character_defaults_to_surname() {
    let e = parse_entry("Daniel Craig wears an Omega Seamaster in Casino Royale (2006)").unwrap();
    assert_eq!(e.character, "Craig");
    assert_eq!(e.character_source, CharacterSource::ActorSurname);
}

#[test]
fn fixed_fields_on_success() {
    let e = parse_entry("Daniel Craig wears an Omega Seamaster in Casino Royale (2006)").unwrap();
    assert_eq!(e.verification, VerificationLevel::Confirmed);
    assert_eq!(e.narrative, DEFAULT_NARRATIVE);
    assert!(e.source_url.is_none());
}

#[test]
fn caller_overrides_narrative_and_source() {
    let e = parse_entry("Daniel Craig wears an Omega Seamaster in Casino Royale (2006)")
        .unwrap()
        .with_narrative(Some("Worn during the train scene.".to_string()))
        .with_source_url(Some("https://example.com/casino".to_string()));
    assert_eq!(e.narrative, "Worn during the train scene.");
    assert_eq!(e.source_url.as_deref(), Some("https://example.com/casino"));

    let e = e.with_narrative(Some("   ".to_string()));
    assert_eq!(e.narrative, "Worn during the train scene.");
}

#[test]
fn unparseable_input() {
    assert_eq!(
        parse_entry("random text with no structure"),
        Err(ParseError::CouldNotParse)
    );
    assert_eq!(parse_entry(""), Err(ParseError::CouldNotParse));
    assert_eq!(
        parse_entry("Someone wears a Rolex in Dr. No"),
        Err(ParseError::CouldNotParse)
    );
}

#[test]
fn custom_lexicon_is_used() {
    let lexicon = BrandLexicon::new(["Vostok"]);
    let e = parse_entry_with("Someone wears a Vostokmatic 2 in Leviathan (2014)", &lexicon).unwrap();
    assert_eq!(e.brand, "Vostok");
    assert_eq!(e.model, "matic 2");
}

#[test]
fn custom_lexicon_order_does_not_matter() {
    let lexicon = BrandLexicon::new(["Heuer", "TAG Heuer"]);
    let (brand, model) = split_watch_phrase("TAG Heuer Carrera", &lexicon);
    assert_eq!(brand, "TAG Heuer");
    assert_eq!(model, "Carrera");

    let (brand, model) = split_watch_phrase("Carrera by TAG Heuer", &lexicon);
    assert_eq!(brand, "TAG Heuer");
    assert_eq!(model, "Carrera");
}

#[test]
fn attribution_keeps_text_after_brand() {
    let lexicon = BrandLexicon::builtin();
    let (brand, model) = split_watch_phrase("Speedmaster by Omega, steel", &lexicon);
    assert_eq!(brand, "Omega");
    assert_eq!(model, "Speedmaster, steel");
}
