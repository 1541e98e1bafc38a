//! Trait definitions for search domain abstractions.
//!
//! These traits enable dependency injection and easy testing through mocking.

use async_trait::async_trait;
use time::OffsetDateTime;

use super::types::{ContentType, SearchFilters, SearchResult};

/// Error type for search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Fetch from {collection} timed out")]
    Timeout { collection: &'static str },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<sqlx::Error> for SearchError {
    fn from(e: sqlx::Error) -> Self {
        SearchError::DatabaseError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// A single declarative predicate on a named record field.
///
/// Field names are `&'static str` owned by the record definitions, never
/// caller input, so stores may splice them into generated queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Boolean column must be true
    IsTrue(&'static str),
    /// Scalar text column equals one of the values
    AnyOf {
        field: &'static str,
        values: Vec<String>,
    },
    /// List column shares at least one element with the values
    Overlaps {
        field: &'static str,
        values: Vec<String>,
    },
    /// Text column contains at least one value (case-insensitive)
    ContainsAny {
        field: &'static str,
        values: Vec<String>,
    },
    /// Numeric column is present and `>= value`
    AtLeast { field: &'static str, value: f64 },
    /// Numeric column is present and `<= value`
    AtMost { field: &'static str, value: f64 },
    /// Timestamp column is present and within the (inclusive) bounds
    Between {
        field: &'static str,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    },
}

/// Read request against one content collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionQuery {
    /// Case-insensitive substring OR-matched across `text_fields`.
    /// `None` skips the text predicate.
    pub text: Option<String>,
    pub text_fields: &'static [&'static str],
    pub constraints: Vec<Constraint>,
    /// Maximum rows to return, most recent first
    pub limit: usize,
}

/// Borrowed view of a record field, used by in-memory stores to evaluate
/// [`Constraint`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    List(&'a [String]),
    Bool(bool),
    Number(Option<f64>),
    Timestamp(Option<OffsetDateTime>),
    Missing,
}

impl<'a> FieldValue<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(text) => *text,
            _ => None,
        }
    }
}

/// A row type stored in one of the searchable collections.
///
/// Each implementation declares how its collection is queried: table name,
/// primary text fields, the baseline visibility predicate and which
/// [`SearchFilters`] fields apply to it.
pub trait ContentRecord: Clone + Send + Sync + 'static {
    const CONTENT_TYPE: ContentType;
    /// Backing table / collection name
    const COLLECTION: &'static str;
    /// Fields matched by the query text, in display order
    const TEXT_FIELDS: &'static [&'static str];

    /// Predicates every returned record must satisfy (active, published, ...).
    fn baseline() -> Vec<Constraint>;

    /// Translate the filters relevant to this collection into constraints.
    fn constraints(filters: &SearchFilters) -> Vec<Constraint>;

    /// Look up a field by name.
    fn field(&self, name: &str) -> FieldValue<'_>;

    /// Convert into the common result shape.
    fn into_result(self, relevance_score: f64, highlights: Vec<String>) -> SearchResult;

    /// Values of [`Self::TEXT_FIELDS`], `None` where the record has no text.
    fn text_values(&self) -> Vec<Option<&str>> {
        Self::TEXT_FIELDS
            .iter()
            .map(|name| self.field(name).as_text())
            .collect()
    }
}

/// Read-only access to one content collection.
///
/// Abstracts the backing store (PostgreSQL, mocks) for testing without a
/// real database.
#[async_trait]
pub trait ContentStore<R: ContentRecord>: Send + Sync {
    /// Fetch records matching the query, newest first, at most `query.limit`.
    async fn fetch(&self, query: &CollectionQuery) -> Result<Vec<R>>;
}
