//! Cross-collection ranking of merged search results.

use time::{Duration, OffsetDateTime};

use super::types::{ContentType, SearchFilters, SearchResult};

/// Orders merged results from every collection.
///
/// Implementations must return a total, descending order and be stable for
/// equal scores (earlier input first).
pub trait Ranker: Send + Sync {
    fn rank(
        &self,
        results: Vec<SearchResult>,
        query: &str,
        filters: &SearchFilters,
        boost_recent: bool,
    ) -> Vec<SearchResult>;
}

/// Additive heuristic: base relevance plus fixed boosts for verified content,
/// recent content and actionable content types (jobs, programs).
#[derive(Debug, Clone)]
pub struct BoostRanker {
    pub verified_boost: f64,
    pub recency_boost: f64,
    pub recency_window: Duration,
    pub actionable_boost: f64,
}

impl Default for BoostRanker {
    fn default() -> Self {
        Self {
            verified_boost: 0.1,
            recency_boost: 0.05,
            recency_window: Duration::days(30),
            actionable_boost: 0.02,
        }
    }
}

impl BoostRanker {
    fn boost(&self, result: &SearchResult, now: OffsetDateTime, boost_recent: bool) -> f64 {
        let mut boost = 0.0;

        if result.metadata.verified() {
            boost += self.verified_boost;
        }

        if boost_recent {
            if let Some(created_at) = result.created_at {
                let age = now - created_at;
                if age >= Duration::ZERO && age <= self.recency_window {
                    boost += self.recency_boost;
                }
            }
        }

        if matches!(
            result.content_type(),
            ContentType::Job | ContentType::Program
        ) {
            boost += self.actionable_boost;
        }

        boost
    }
}

impl Ranker for BoostRanker {
    fn rank(
        &self,
        mut results: Vec<SearchResult>,
        _query: &str,
        _filters: &SearchFilters,
        boost_recent: bool,
    ) -> Vec<SearchResult> {
        let now = OffsetDateTime::now_utc();
        for result in &mut results {
            result.relevance_score += self.boost(result, now, boost_recent);
        }

        // sort_by is stable, ties keep merge order
        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        results
    }
}
