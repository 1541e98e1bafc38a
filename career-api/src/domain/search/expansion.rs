//! Climate-domain synonym expansion of search queries.
//!
//! The expansion is informational: it is returned to callers alongside the
//! results but does not change what the collections are searched for.

use itertools::Itertools;

static SYNONYMS: &[(&str, &[&str])] = &[
    ("solar", &["photovoltaic", "pv", "solar energy"]),
    ("wind", &["wind energy", "wind power", "turbine"]),
    (
        "renewable",
        &["clean energy", "green energy", "sustainable energy"],
    ),
    ("climate", &["environmental", "sustainability", "carbon"]),
    ("green", &["sustainable", "eco-friendly", "environmental"]),
    ("ev", &["electric vehicle", "e-mobility"]),
    ("battery", &["energy storage", "storage"]),
    ("efficiency", &["energy efficiency", "retrofit"]),
    ("carbon", &["emissions", "decarbonization", "net zero"]),
    ("job", &["career", "position", "opportunity"]),
    ("jobs", &["careers", "positions", "opportunities"]),
    ("training", &["course", "certification", "program"]),
    ("course", &["training", "class", "program"]),
    ("internship", &["apprenticeship", "entry level"]),
];

/// Expand a query with synonyms of its terms.
///
/// The original query is always the first entry; the result contains no
/// duplicates.
pub fn expand_query(query: &str) -> Vec<String> {
    let query = query.trim();
    let synonyms = query.split_whitespace().flat_map(|term| {
        let term = term.to_lowercase();
        SYNONYMS
            .iter()
            .find(|(key, _)| *key == term)
            .map(|(_, synonyms)| *synonyms)
            .unwrap_or_default()
            .iter()
            .map(|synonym| synonym.to_string())
    });

    std::iter::once(query.to_string())
        .chain(synonyms)
        .unique()
        .collect()
}
