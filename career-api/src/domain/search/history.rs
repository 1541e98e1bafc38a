//! In-memory record of past search queries.
//!
//! Shared by every request served by one engine, so all access goes through
//! a mutex. Nothing here outlives the process.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};

use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularQuery {
    pub query: String,
    pub count: u64,
}

#[derive(Debug, Default)]
struct HistoryState {
    /// Raw queries, oldest first
    recent: VecDeque<String>,
    /// Normalized query -> times searched
    popularity: HashMap<String, TrackedQuery>,
}

#[derive(Debug)]
struct TrackedQuery {
    count: u64,
    /// Most recent spelling, as typed
    latest: String,
}

/// Recent queries plus per-query popularity counts.
///
/// The raw history keeps the last `capacity` queries. Popularity counts
/// survive a query leaving that window, but at most `max_tracked` distinct
/// queries are counted: when full, the least popular query that is no longer
/// in the recent window is dropped first.
#[derive(Debug)]
pub struct QueryHistory {
    state: Mutex<HistoryState>,
    capacity: usize,
    max_tracked: usize,
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

impl QueryHistory {
    pub fn new(capacity: usize, max_tracked: usize) -> Self {
        Self {
            state: Mutex::new(HistoryState::default()),
            capacity: capacity.max(1),
            max_tracked: max_tracked.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a searched query. Blank queries are ignored.
    pub fn record(&self, query: &str) {
        let key = normalize(query);
        if key.is_empty() {
            return;
        }

        let mut state = self.lock();

        state.recent.push_back(query.trim().to_string());
        while state.recent.len() > self.capacity {
            state.recent.pop_front();
        }

        if !state.popularity.contains_key(&key) && state.popularity.len() >= self.max_tracked {
            evict_least_popular(&mut state);
        }
        let latest = query.trim().to_string();
        state
            .popularity
            .entry(key)
            .and_modify(|tracked| {
                tracked.count += 1;
                tracked.latest.clone_from(&latest);
            })
            .or_insert(TrackedQuery { count: 1, latest });
    }

    /// Most recent queries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<String> {
        self.lock().recent.iter().rev().take(limit).cloned().collect()
    }

    /// Most searched queries, by count descending.
    pub fn popular(&self, limit: usize) -> Vec<PopularQuery> {
        let state = self.lock();
        state
            .popularity
            .iter()
            .sorted_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)))
            .take(limit)
            .map(|(_, tracked)| PopularQuery {
                query: tracked.latest.clone(),
                count: tracked.count,
            })
            .collect()
    }

    /// Tracked queries extending `prefix` (case-insensitive), most popular
    /// first, in their most recently typed spelling. The prefix itself is
    /// never returned.
    pub fn completions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = normalize(prefix);
        let state = self.lock();
        state
            .popularity
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix) && **key != prefix)
            .sorted_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)))
            .take(limit)
            .map(|(_, tracked)| tracked.latest.clone())
            .collect()
    }

    /// Forget all recorded queries and counts.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.recent.clear();
        state.popularity.clear();
    }

    /// Number of distinct queries with a popularity count.
    pub fn tracked(&self) -> usize {
        self.lock().popularity.len()
    }
}

fn evict_least_popular(state: &mut HistoryState) {
    let in_window: HashSet<String> = state.recent.iter().map(|q| normalize(q)).collect();
    let victim = state
        .popularity
        .iter()
        .filter(|(query, _)| !in_window.contains(*query))
        .min_by(|a, b| a.1.count.cmp(&b.1.count).then_with(|| a.0.cmp(b.0)))
        .or_else(|| {
            state
                .popularity
                .iter()
                .min_by(|a, b| a.1.count.cmp(&b.1.count).then_with(|| a.0.cmp(b.0)))
        })
        .map(|(query, _)| query.clone());

    if let Some(victim) = victim {
        state.popularity.remove(&victim);
    }
}
