//! Query completions from search history and a fixed climate-career list.

use super::history::QueryHistory;

const MAX_SUGGESTIONS: usize = 5;
const MAX_HISTORY_SUGGESTIONS: usize = 3;

static DOMAIN_SUGGESTIONS: &[&str] = &[
    "renewable energy jobs",
    "solar installation",
    "solar panel technician",
    "wind turbine technician",
    "energy efficiency",
    "sustainability careers",
    "sustainability consultant",
    "climate policy",
    "climate tech startups",
    "carbon accounting",
    "electric vehicle jobs",
    "battery storage engineer",
    "green building",
    "environmental justice",
    "clean energy training",
    "climate resilience",
    "circular economy",
    "heat pump installer",
];

/// Suggest up to five completions for `query`.
///
/// Up to three come from previously searched queries that extend it, most
/// popular first; the rest from the static domain list entries containing
/// it. The query itself is never suggested.
pub fn suggest(history: &QueryHistory, query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();

    let mut suggestions = history.completions(&needle, MAX_HISTORY_SUGGESTIONS);

    for candidate in DOMAIN_SUGGESTIONS {
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }
        if candidate.contains(needle.as_str())
            && *candidate != needle
            && !suggestions.iter().any(|s| s.eq_ignore_ascii_case(candidate))
        {
            suggestions.push(candidate.to_string());
        }
    }

    suggestions
}
