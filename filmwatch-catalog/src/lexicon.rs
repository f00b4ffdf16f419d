//! Ordered table of known watch brands.
//!
//! The parser consults the lexicon to pull a brand out of a watch phrase,
//! either from a "by <Brand>"/"from <Brand>" attribution or from the start of
//! the phrase. When several entries match, the longest name wins and ties go
//! to the earlier entry, so "IWC Schaffhausen" beats "IWC" regardless of the
//! order a custom table lists them in.

/// Built-in brands, longest/most specific first.
pub const BUILTIN_BRANDS: &[&str] = &[
    "Audemars Piguet",
    "Patek Philippe",
    "Vacheron Constantin",
    "Jaeger-LeCoultre",
    "A. Lange & Söhne",
    "Frederique Constant",
    "Ulysse Nardin",
    "Girard-Perregaux",
    "Glashutte Original",
    "Universal Genève",
    "Richard Mille",
    "Bell & Ross",
    "Maurice Lacroix",
    "Carl F. Bucherer",
    "Raymond Weil",
    "TAG Heuer",
    "IWC Schaffhausen",
    "Franck Muller",
    "Rolex",
    "Omega",
    "Heuer",
    "Hamilton",
    "Panerai",
    "Breitling",
    "IWC",
    "Cartier",
    "Zenith",
    "Breguet",
    "Longines",
    "Seiko",
    "Citizen",
    "Casio",
    "Timex",
    "Doxa",
    "Hublot",
    "Tudor",
    "Bulgari",
    "Chopard",
    "Oris",
    "Tissot",
    "Rado",
    "Mido",
    "Certina",
    "Swatch",
    "Luminox",
    "Fortis",
    "Glycine",
    "Stowa",
    "Nomos",
    "Junghans",
    "Sinn",
    "Hanhart",
    "Laco",
    "Damasko",
    "Ball",
    "Alpina",
    "Movado",
    "Ebel",
    "Concord",
    "Corum",
    "Parmigiani",
    "Piaget",
    "Blancpain",
    "Bremont",
    "Christopher Ward",
    "Squale",
    "Steinhart",
    "Halios",
    "Monta",
    "Farer",
    "Lorier",
    "G-Shock",
    "Victorinox",
    "Bulova",
    "Gruen",
    "Elgin",
    "Waltham",
];

/// Connectors that attribute a watch to a maker ("a diver by Omega").
const ATTRIBUTION_CONNECTORS: &[&str] = &[" by ", " from "];

/// An ordered list of brand names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandLexicon {
    brands: Vec<String>,
}

/// A "by <Brand>" or "from <Brand>" occurrence inside a watch phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribution<'a> {
    /// The lexicon spelling of the brand.
    pub brand: &'a str,
    /// Byte offset where the connector (including its leading space) starts.
    pub start: usize,
    /// Byte offset just past the brand name.
    pub end: usize,
}

impl BrandLexicon {
    /// Build a lexicon from names in priority order.
    ///
    /// Names are trimmed, blanks are dropped, and a name that repeats an
    /// earlier one (ignoring case) is skipped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut brands: Vec<String> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                continue;
            }
            if brands.iter().any(|b| eq_ignore_case(b, &name)) {
                continue;
            }
            brands.push(name);
        }
        Self { brands }
    }

    /// The built-in brand table.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_BRANDS.iter().copied())
    }

    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    /// Find the best "by <Brand>" / "from <Brand>" attribution in `phrase`.
    pub fn find_attribution(&self, phrase: &str) -> Option<Attribution<'_>> {
        let mut best: Option<Attribution<'_>> = None;
        for brand in &self.brands {
            for connector in ATTRIBUTION_CONNECTORS {
                let needle = format!("{connector}{brand}");
                if let Some((start, end)) = find_ignore_case(phrase, &needle) {
                    if is_longer(brand, best.map(|b| b.brand)) {
                        best = Some(Attribution {
                            brand: brand.as_str(),
                            start,
                            end,
                        });
                    }
                    // "by" is checked before "from" for the same brand
                    break;
                }
            }
        }
        best
    }

    /// Find the best brand that `phrase` starts with.
    ///
    /// Returns the lexicon spelling and the remainder of the phrase after it.
    pub fn find_prefix<'p>(&self, phrase: &'p str) -> Option<(&str, &'p str)> {
        let mut best: Option<(&str, &'p str)> = None;
        for brand in &self.brands {
            if let Some(rest) = strip_prefix_ignore_case(phrase, brand)
                && is_longer(brand, best.map(|(b, _)| b))
            {
                best = Some((brand.as_str(), rest));
            }
        }
        best
    }
}

impl Default for BrandLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_longer(candidate: &str, current: Option<&str>) -> bool {
    match current {
        None => true,
        Some(current) => candidate.chars().count() > current.chars().count(),
    }
}

// ── Case-insensitive text helpers ───────────────────────────────────────────

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    strip_prefix_ignore_case(a, b).is_some_and(str::is_empty)
}

/// Strip `prefix` from the start of `s`, comparing characters without case.
pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = s.char_indices();
    let mut consumed = 0;
    for p in prefix.chars() {
        let (i, c) = chars.next()?;
        if !chars_eq_ignore_case(c, p) {
            return None;
        }
        consumed = i + c.len_utf8();
    }
    Some(&s[consumed..])
}

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`.
pub(crate) fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    haystack.char_indices().find_map(|(i, _)| {
        strip_prefix_ignore_case(&haystack[i..], needle)
            .map(|rest| (i, haystack.len() - rest.len()))
    })
}
