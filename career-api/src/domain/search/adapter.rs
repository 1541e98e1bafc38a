//! Generic per-collection search adapter.

use std::sync::Arc;
use std::time::Duration;

use itertools::Itertools;
use tracing::{debug, warn};

use super::scoring::{extract_highlights, relevance_score};
use super::traits::{CollectionQuery, ContentRecord, ContentStore, SearchError};
use super::types::{SearchFilters, SearchResult};

/// Searches one content collection and maps its records to [`SearchResult`]s.
///
/// What is queried (baseline predicate, text fields, filter mapping) comes
/// from the record type's [`ContentRecord`] implementation. Fetches are
/// capped at `fetch_cap` rows, so ranking works on a recent working set
/// rather than the whole collection.
pub struct CollectionAdapter<R: ContentRecord> {
    store: Arc<dyn ContentStore<R>>,
    fetch_cap: usize,
    timeout: Duration,
}

impl<R: ContentRecord> CollectionAdapter<R> {
    pub fn new(store: Arc<dyn ContentStore<R>>, fetch_cap: usize, timeout: Duration) -> Self {
        Self {
            store,
            fetch_cap,
            timeout,
        }
    }

    /// Build the store query for `query` and `filters`.
    pub fn collection_query(&self, query: &str, filters: &SearchFilters) -> CollectionQuery {
        let query = query.trim();
        let mut constraints = R::baseline();
        constraints.extend(R::constraints(filters));

        CollectionQuery {
            text: (!query.is_empty()).then(|| query.to_string()),
            text_fields: R::TEXT_FIELDS,
            constraints,
            limit: self.fetch_cap,
        }
    }

    /// Search the collection.
    ///
    /// Never fails: a store error or a fetch exceeding the timeout is logged
    /// and yields no results, so other collections can still answer.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Vec<SearchResult> {
        if !filters.includes(R::CONTENT_TYPE) {
            return Vec::new();
        }

        let request = self.collection_query(query, filters);
        let fetched = match tokio::time::timeout(self.timeout, self.store.fetch(&request)).await {
            Ok(fetched) => fetched,
            Err(_) => Err(SearchError::Timeout {
                collection: R::COLLECTION,
            }),
        };

        let records = match fetched {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    collection = R::COLLECTION,
                    error = %e,
                    "Collection search failed, continuing without it"
                );
                return Vec::new();
            }
        };

        debug!(
            collection = R::COLLECTION,
            fetched = records.len(),
            "Collection search completed"
        );

        let query = query.trim();
        records
            .into_iter()
            .map(|record| to_result(query, record))
            .collect()
    }
}

fn to_result<R: ContentRecord>(query: &str, record: R) -> SearchResult {
    let (score, highlights) = {
        let texts = record.text_values();
        let content = texts.iter().flatten().join(" ");
        (
            relevance_score(query, &content),
            extract_highlights(query, &texts),
        )
    };
    record.into_result(score, highlights)
}
