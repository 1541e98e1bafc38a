//! Search engine facade: fans a query out to every collection and assembles
//! the ranked, paginated response.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_with::serde_as;
use tracing::{info, instrument};

use super::adapter::CollectionAdapter;
use super::expansion::expand_query;
use super::facets::aggregate_facets;
use super::history::{PopularQuery, QueryHistory};
use super::ranker::{BoostRanker, Ranker};
use super::records::{JobRecord, PartnerRecord, ProgramRecord, ResourceRecord};
use super::suggestions::suggest;
use super::traits::{ContentStore, Result, SearchError};
use super::types::{Breakdown, Facets, SearchFilters, SearchOptions, SearchResponse};

/// Configuration for the search engine.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size when the caller gives none
    pub default_limit: usize,
    /// Larger page sizes are clamped to this
    pub max_limit: usize,
    /// Rows fetched per collection before ranking
    pub fetch_cap: usize,
    /// Deadline for a single collection fetch
    #[serde(rename = "adapter_timeout_ms")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub adapter_timeout: Duration,
    /// Raw queries kept for history display
    pub history_capacity: usize,
    /// Distinct queries with popularity counts
    pub max_tracked_queries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 1000,
            fetch_cap: 50,
            adapter_timeout: Duration::from_secs(5),
            history_capacity: 100,
            max_tracked_queries: 10_000,
        }
    }
}

/// The four collections the engine searches.
pub struct ContentStores {
    pub jobs: Arc<dyn ContentStore<JobRecord>>,
    pub resources: Arc<dyn ContentStore<ResourceRecord>>,
    pub partners: Arc<dyn ContentStore<PartnerRecord>>,
    pub programs: Arc<dyn ContentStore<ProgramRecord>>,
}

/// Multi-collection search over jobs, resources, partners and programs.
///
/// The only shared mutable state is the injected [`QueryHistory`], so one
/// engine can serve concurrent requests.
///
/// # Examples
///
/// ```ignore
/// let history = Arc::new(QueryHistory::new(100, 10_000));
/// let engine = SearchEngine::new(stores, history, SearchConfig::default());
///
/// let response = engine
///     .search("solar", &SearchFilters::default(), SearchOptions::default())
///     .await?;
/// ```
pub struct SearchEngine {
    jobs: CollectionAdapter<JobRecord>,
    resources: CollectionAdapter<ResourceRecord>,
    partners: CollectionAdapter<PartnerRecord>,
    programs: CollectionAdapter<ProgramRecord>,
    ranker: Box<dyn Ranker>,
    history: Arc<QueryHistory>,
    config: SearchConfig,
}

impl SearchEngine {
    /// Create an engine ranking with [`BoostRanker`].
    pub fn new(stores: ContentStores, history: Arc<QueryHistory>, config: SearchConfig) -> Self {
        let cap = config.fetch_cap;
        let timeout = config.adapter_timeout;

        Self {
            jobs: CollectionAdapter::new(stores.jobs, cap, timeout),
            resources: CollectionAdapter::new(stores.resources, cap, timeout),
            partners: CollectionAdapter::new(stores.partners, cap, timeout),
            programs: CollectionAdapter::new(stores.programs, cap, timeout),
            ranker: Box::new(BoostRanker::default()),
            history,
            config,
        }
    }

    /// Replace the ranking strategy.
    #[cfg(test)]
    pub fn with_ranker(mut self, ranker: impl Ranker + 'static) -> Self {
        self.ranker = Box::new(ranker);
        self
    }

    /// Search every collection.
    ///
    /// Collections are queried concurrently; one that fails or times out
    /// contributes no results instead of failing the search. Facets and
    /// `total_count` cover the full ranked set, `results` only the requested
    /// page.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidArgument`] for a negative limit or offset.
    #[instrument(skip(self, filters, options))]
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        options: SearchOptions,
    ) -> Result<SearchResponse> {
        let started = Instant::now();
        let (limit, offset) = self.page(&options)?;

        self.history.record(query);
        let query_expansion = expand_query(query);

        let (jobs, resources, partners, programs) = tokio::join!(
            self.jobs.search(query, filters),
            self.resources.search(query, filters),
            self.partners.search(query, filters),
            self.programs.search(query, filters),
        );

        let combined = jobs
            .into_iter()
            .chain(resources)
            .chain(partners)
            .chain(programs)
            .collect();
        let ranked = self
            .ranker
            .rank(combined, query, filters, options.boost_recent);

        let total_count = ranked.len();
        let breakdown = Breakdown::from_results(&ranked);
        let facets = if options.include_facets {
            aggregate_facets(&ranked)
        } else {
            Facets::new()
        };
        let results = ranked.into_iter().skip(offset).take(limit).collect();
        let suggestions = suggest(&self.history, query);

        let search_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            total_count,
            jobs = breakdown.jobs,
            resources = breakdown.resources,
            partners = breakdown.partners,
            programs = breakdown.programs,
            search_time_ms,
            tracked_queries = self.history.tracked(),
            "Search completed"
        );

        Ok(SearchResponse {
            results,
            total_count,
            search_time_ms,
            suggestions,
            facets,
            query_expansion,
            breakdown,
        })
    }

    /// Completions for a partially typed query.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        suggest(&self.history, query)
    }

    pub fn recent_queries(&self, limit: usize) -> Vec<String> {
        self.history.recent(limit)
    }

    pub fn popular_queries(&self, limit: usize) -> Vec<PopularQuery> {
        self.history.popular(limit)
    }

    pub fn clear_history(&self) {
        self.history.clear();
        info!("Search history cleared");
    }

    /// Validated `(limit, offset)`.
    fn page(&self, options: &SearchOptions) -> Result<(usize, usize)> {
        let limit = match options.limit {
            Some(limit) => usize::try_from(limit).map_err(|_| {
                SearchError::InvalidArgument(format!("limit must not be negative, got {limit}"))
            })?,
            None => self.config.default_limit,
        };
        let offset = match options.offset {
            Some(offset) => usize::try_from(offset).map_err(|_| {
                SearchError::InvalidArgument(format!("offset must not be negative, got {offset}"))
            })?,
            None => 0,
        };

        Ok((limit.min(self.config.max_limit), offset))
    }
}
