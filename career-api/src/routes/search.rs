use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_with::{formats::CommaSeparator, serde_as, StringWithSeparator};
use tracing::instrument;

use super::ApiError;
use crate::{
    domain::search::{ContentType, PopularQuery, SearchFilters, SearchOptions, SearchResponse},
    AppState,
};

const DEFAULT_HISTORY_LIMIT: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_by_query).post(search))
        .route("/suggestions", get(suggestions))
        .route("/history", get(history).delete(clear_history))
}

/// Full search request with every filter and option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchRequest {
    query: String,
    filters: SearchFilters,
    options: SearchOptions,
}

/// Query string form of a search, for links and simple browse pages.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchQuery {
    q: String,
    limit: Option<i64>,
    offset: Option<i64>,
    include_facets: Option<bool>,
    boost_recent: Option<bool>,
    /// e.g. `content_types=job,program`
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, ContentType>>")]
    content_types: Option<Vec<ContentType>>,
}

impl SearchQuery {
    fn into_request(self) -> SearchRequest {
        let defaults = SearchOptions::default();
        SearchRequest {
            query: self.q,
            filters: SearchFilters {
                content_types: self.content_types,
                ..Default::default()
            },
            options: SearchOptions {
                limit: self.limit,
                offset: self.offset,
                include_facets: self.include_facets.unwrap_or(defaults.include_facets),
                boost_recent: self.boost_recent.unwrap_or(defaults.boost_recent),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SuggestionQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct HistoryResponse {
    recent: Vec<String>,
    popular: Vec<PopularQuery>,
}

#[instrument(name = "POST /search", skip(app_state))]
async fn search(
    State(app_state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let response = app_state
        .search_engine()
        .search(&request.query, &request.filters, request.options)
        .await?;

    Ok(Json(response))
}

#[instrument(name = "GET /search", skip(app_state))]
async fn search_by_query(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = query.into_request();
    let response = app_state
        .search_engine()
        .search(&request.query, &request.filters, request.options)
        .await?;

    Ok(Json(response))
}

#[instrument(name = "GET /search/suggestions", skip(app_state))]
async fn suggestions(
    State(app_state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<Vec<String>> {
    Json(app_state.search_engine().suggest(&query.q))
}

#[instrument(name = "GET /search/history", skip(app_state))]
async fn history(
    State(app_state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let engine = app_state.search_engine();

    Json(HistoryResponse {
        recent: engine.recent_queries(limit),
        popular: engine.popular_queries(limit),
    })
}

#[instrument(name = "DELETE /search/history", skip(app_state))]
async fn clear_history(State(app_state): State<AppState>) -> StatusCode {
    app_state.search_engine().clear_history();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::search::{
        repository::MockContentStore, ContentStores, JobRecord, ProgramRecord, QueryHistory,
        SearchConfig, SearchEngine,
    };

    fn app() -> Router {
        let stores = ContentStores {
            jobs: Arc::new(MockContentStore::new().with_records(vec![JobRecord {
                id: "j1".to_string(),
                title: "Solar Installation Technician".to_string(),
                employment_type: Some("full_time".to_string()),
                verified: true,
                is_active: true,
                ..Default::default()
            }])),
            resources: Arc::new(MockContentStore::new()),
            partners: Arc::new(MockContentStore::new()),
            programs: Arc::new(MockContentStore::new().with_records(vec![ProgramRecord {
                id: "g1".to_string(),
                title: "Solar Training Certificate".to_string(),
                is_active: true,
                ..Default::default()
            }])),
        };
        let engine = SearchEngine::new(
            stores,
            Arc::new(QueryHistory::new(100, 1000)),
            SearchConfig::default(),
        );

        router().with_state(AppState::from_engine(engine))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn post_search_returns_response_envelope() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"query": "solar", "options": {"limit": 10, "include_facets": true}}"#,
            ))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 2);
        assert_eq!(body["results"][0]["type"], "job");
        assert_eq!(body["breakdown"]["programs"], 1);
        assert_eq!(body["facets"]["employment_type"][0]["value"], "full_time");
        assert_eq!(body["query_expansion"][0], "solar");
    }

    #[tokio::test]
    async fn get_search_filters_content_types() {
        let app = app();
        let (status, body) = send(&app, get("/?q=solar&content_types=program")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["results"][0]["type"], "program");
    }

    #[tokio::test]
    async fn negative_limit_is_bad_request() {
        let app = app();
        let (status, body) = send(&app, get("/?q=solar&limit=-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn history_round_trip() {
        let app = app();
        send(&app, get("/?q=solar%20jobs")).await;

        let (_, body) = send(&app, get("/history")).await;
        assert_eq!(body["recent"][0], "solar jobs");
        assert_eq!(body["popular"][0]["count"], 1);

        let (_, suggestions) = send(&app, get("/suggestions?q=solar")).await;
        assert_eq!(suggestions[0], "solar jobs");

        let request = Request::builder()
            .method("DELETE")
            .uri("/history")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, get("/history")).await;
        assert_eq!(body["recent"], Value::Array(vec![]));
    }
}
