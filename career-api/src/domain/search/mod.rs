//! Multi-collection search over jobs, resources, partners and programs.
//!
//! A single query is fanned out to the four content collections, each result
//! is scored against the query text, and the merged set is ranked with
//! additive boosts, paginated and summarized with facets and suggestions.
//!
//! # Architecture
//!
//! The search system is built around trait abstractions for testability:
//!
//! - [`ContentRecord`](traits::ContentRecord) - Per-collection query definition (text fields,
//!   baseline predicate, filter mapping)
//! - [`ContentStore`](traits::ContentStore) - Read access to a collection (PostgreSQL, mocks)
//! - [`Ranker`](ranker::Ranker) - Ordering strategy for the merged results
//!
//! [`SearchEngine`] is the only entry point callers need.
//!
//! # Example
//!
//! ```ignore
//! use career_api::domain::search::{SearchEngine, SearchConfig, QueryHistory};
//! use career_api::domain::search::repository::PgContentStore;
//!
//! let stores = ContentStores {
//!     jobs: Arc::new(PgContentStore::new(pool.clone())),
//!     resources: Arc::new(PgContentStore::new(pool.clone())),
//!     partners: Arc::new(PgContentStore::new(pool.clone())),
//!     programs: Arc::new(PgContentStore::new(pool)),
//! };
//! let history = Arc::new(QueryHistory::new(100, 10_000));
//! let engine = SearchEngine::new(stores, history, SearchConfig::default());
//!
//! let response = engine
//!     .search("solar", &SearchFilters::default(), SearchOptions::default())
//!     .await?;
//! ```
//!
//! # Known approximations
//!
//! Each collection contributes at most `fetch_cap` of its most recent
//! matches, so ranking is over a representative working set rather than an
//! exhaustive scan. Query expansion is returned to callers but does not widen
//! what is fetched.

mod adapter;
mod engine;
mod expansion;
mod facets;
mod history;
mod ranker;
mod records;
mod scoring;
mod suggestions;
mod traits;
mod types;

pub mod repository;

// Re-export main types
pub use engine::{ContentStores, SearchConfig, SearchEngine};
pub use history::{PopularQuery, QueryHistory};
pub use records::{JobRecord, PartnerRecord, ProgramRecord, ResourceRecord};
pub use traits::SearchError;
pub use types::{ContentType, SearchFilters, SearchOptions, SearchResponse};
