//! Term-based relevance scoring and highlight extraction.

use regex::{Regex, RegexBuilder};

/// Bonus for a term whose first occurrence is at the very start of the content.
const POSITION_BONUS: f64 = 0.5;
/// Bonus per repeated occurrence of a term.
const REPEAT_BONUS: f64 = 0.1;
/// Repeated occurrences counted beyond the first.
const MAX_REPEATS: usize = 3;

const MAX_HIGHLIGHTS: usize = 3;
const OCCURRENCES_PER_TERM: usize = 2;
/// Characters of context kept on each side of a match
const CONTEXT_CHARS: usize = 50;

/// Score how well `content` matches the whitespace-separated terms of `query`.
///
/// Each term found in the content contributes 1, plus up to 0.5 the earlier
/// it first appears, plus 0.1 for each of up to 3 repeated occurrences. The
/// sum is divided by the number of terms, so partial matches of a long query
/// score lower than full matches.
///
/// Matching is case-insensitive. Returns 0 for an empty query or content.
pub fn relevance_score(query: &str, content: &str) -> f64 {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() || content.is_empty() {
        return 0.0;
    }

    let content = content.to_lowercase();
    let length = content.len() as f64;

    let total: f64 = terms
        .iter()
        .filter_map(|term| {
            let first = content.find(term.as_str())?;
            let position = POSITION_BONUS * (1.0 - first as f64 / length);
            let repeats = content
                .matches(term.as_str())
                .count()
                .saturating_sub(1)
                .min(MAX_REPEATS);
            Some(1.0 + position + repeats as f64 * REPEAT_BONUS)
        })
        .sum();

    total / terms.len() as f64
}

/// Extract up to three excerpts around query term matches.
///
/// Texts are scanned in order, and per text each term in query order, taking
/// at most two occurrences per term. Excerpts keep the order in which they
/// were found. Matched text is wrapped in `<mark>` tags and clipped edges are
/// marked with `...`.
pub fn extract_highlights(query: &str, texts: &[Option<&str>]) -> Vec<String> {
    let patterns: Vec<Regex> = query
        .split_whitespace()
        .filter_map(|term| {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect();

    let mut highlights = Vec::new();
    if patterns.is_empty() {
        return highlights;
    }

    for text in texts.iter().flatten() {
        for pattern in &patterns {
            for found in pattern.find_iter(text).take(OCCURRENCES_PER_TERM) {
                highlights.push(excerpt(text, found.start(), found.end()));
                if highlights.len() == MAX_HIGHLIGHTS {
                    return highlights;
                }
            }
        }
    }

    highlights
}

fn excerpt(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(CONTEXT_CHARS)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(text.len(), |(i, _)| end + i);

    let mut snippet = String::with_capacity(to - from + 16);
    if from > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&text[from..start]);
    snippet.push_str("<mark>");
    snippet.push_str(&text[start..end]);
    snippet.push_str("</mark>");
    snippet.push_str(&text[end..to]);
    if to < text.len() {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "solar energy jobs in solar installation";

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(relevance_score("", "anything"), 0.0);
        assert_eq!(relevance_score("   ", "anything"), 0.0);
        assert_eq!(relevance_score("term", ""), 0.0);
    }

    #[test]
    fn full_match_scores_higher_than_partial() {
        let full = relevance_score("solar energy", CONTENT);
        let partial = relevance_score("solar wind", CONTENT);
        assert!(full > partial, "{full} should exceed {partial}");
    }

    #[test]
    fn earlier_match_scores_higher() {
        let early = relevance_score("solar", "solar panels and batteries");
        let late = relevance_score("solar", "batteries and solar panels");
        assert!(early > late);
    }

    #[test]
    fn repeated_occurrences_are_capped() {
        // First occurrence at position 0: 1 + 0.5 + 3 * 0.1
        let score = relevance_score("wind", "wind wind wind wind wind wind");
        assert!((score - 1.8).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_case_insensitive() {
        assert_eq!(
            relevance_score("SOLAR", "Solar Installer"),
            relevance_score("solar", "solar installer")
        );
    }

    #[test]
    fn no_match_scores_zero() {
        assert_eq!(relevance_score("geothermal", CONTENT), 0.0);
    }

    #[test]
    fn highlights_mark_matches() {
        let highlights = extract_highlights("solar", &[Some("Solar Installation Technician")]);
        assert_eq!(highlights, vec!["<mark>Solar</mark> Installation Technician"]);
    }

    #[test]
    fn highlights_are_bounded() {
        let text = "solar wind solar wind solar wind";
        let highlights = extract_highlights("solar wind", &[Some(text), Some(text), Some(text)]);
        assert_eq!(highlights.len(), 3);
    }

    #[test]
    fn highlights_keep_reading_order() {
        let highlights = extract_highlights(
            "heat",
            &[None, Some("Heat pumps explained"), Some("District heat networks")],
        );
        assert_eq!(
            highlights,
            vec![
                "<mark>Heat</mark> pumps explained".to_string(),
                "District <mark>heat</mark> networks".to_string(),
            ]
        );
    }

    #[test]
    fn highlights_clip_long_context() {
        let text = format!("{}solar{}", "a".repeat(80), "b".repeat(80));
        let highlights = extract_highlights("solar", &[Some(text.as_str())]);
        assert_eq!(
            highlights[0],
            format!("...{}<mark>solar</mark>{}...", "a".repeat(50), "b".repeat(50))
        );
    }

    #[test]
    fn highlights_respect_char_boundaries() {
        let highlights = extract_highlights("vind", &[Some("Havsbaserad vindkraft på Åland")]);
        assert_eq!(highlights, vec!["Havsbaserad <mark>vind</mark>kraft på Åland"]);
    }

    #[test]
    fn highlights_empty_query() {
        assert!(extract_highlights("", &[Some("anything")]).is_empty());
    }
}
