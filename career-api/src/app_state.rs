use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::search::{
    ContentStores, QueryHistory, SearchConfig, SearchEngine, repository::PgContentStore,
};

#[derive(Clone)]
pub struct AppState {
    search_engine: Arc<SearchEngine>,
}

impl AppState {
    /// Build the state around a PostgreSQL-backed search engine.
    pub fn new(db_pool: PgPool, config: SearchConfig) -> Self {
        let stores = ContentStores {
            jobs: Arc::new(PgContentStore::new(db_pool.clone())),
            resources: Arc::new(PgContentStore::new(db_pool.clone())),
            partners: Arc::new(PgContentStore::new(db_pool.clone())),
            programs: Arc::new(PgContentStore::new(db_pool)),
        };
        let history = Arc::new(QueryHistory::new(
            config.history_capacity,
            config.max_tracked_queries,
        ));

        Self::from_engine(SearchEngine::new(stores, history, config))
    }

    pub fn from_engine(search_engine: SearchEngine) -> Self {
        Self {
            search_engine: Arc::new(search_engine),
        }
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.search_engine
    }
}
