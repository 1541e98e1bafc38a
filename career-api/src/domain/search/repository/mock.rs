//! Mock content store for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::search::traits::{
    CollectionQuery, Constraint, ContentRecord, ContentStore, FieldValue, Result, SearchError,
};

/// Mock content store backed by an in-memory Vec.
///
/// Evaluates [`CollectionQuery`] the same way the PostgreSQL store does:
/// case-insensitive text and substring matching, exact `AnyOf` matching,
/// newest first, capped at the query limit.
///
/// # Examples
///
/// ```ignore
/// let store = MockContentStore::new().with_records(vec![job1, job2]);
/// // or a store whose every fetch fails:
/// let store = MockContentStore::<JobRecord>::failing("connection refused");
/// ```
#[derive(Clone)]
pub struct MockContentStore<R> {
    records: Arc<RwLock<Vec<R>>>,
    /// Error returned from every fetch, if set
    error: Option<String>,
    /// Artificial latency before answering
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    last_query: Arc<RwLock<Option<CollectionQuery>>>,
}

impl<R> Default for MockContentStore<R> {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            error: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            last_query: Arc::new(RwLock::new(None)),
        }
    }
}

#[allow(dead_code)]
impl<R: ContentRecord> MockContentStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every fetch fails with a database error.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Add initial records to the store.
    pub fn with_records(self, records: Vec<R>) -> Self {
        self.records.write().unwrap().extend(records);
        self
    }

    /// Delay every fetch by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent query received.
    pub fn last_query(&self) -> Option<CollectionQuery> {
        self.last_query.read().unwrap().clone()
    }
}

#[async_trait]
impl<R: ContentRecord> ContentStore<R> for MockContentStore<R> {
    async fn fetch(&self, query: &CollectionQuery) -> Result<Vec<R>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.write().unwrap() = Some(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.error {
            return Err(SearchError::DatabaseError(message.clone()));
        }

        let mut matches: Vec<R> = self
            .records
            .read()
            .unwrap()
            .iter()
            .filter(|record| matches_query(*record, query))
            .cloned()
            .collect();

        // Newest first, undated records last
        matches.sort_by(|a, b| {
            let a = a.field("created_at");
            let b = b.field("created_at");
            match (a, b) {
                (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => match (a, b) {
                    (Some(a), Some(b)) => b.cmp(&a),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                },
                _ => std::cmp::Ordering::Equal,
            }
        });
        matches.truncate(query.limit);

        Ok(matches)
    }
}

fn matches_query<R: ContentRecord>(record: &R, query: &CollectionQuery) -> bool {
    if let Some(text) = query.text.as_deref().filter(|t| !t.is_empty()) {
        let needle = text.to_lowercase();
        let text_match = query.text_fields.iter().any(|field| {
            record
                .field(field)
                .as_text()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        });
        if !text_match {
            return false;
        }
    }

    query
        .constraints
        .iter()
        .all(|constraint| satisfies(record, constraint))
}

fn satisfies<R: ContentRecord>(record: &R, constraint: &Constraint) -> bool {
    match constraint {
        Constraint::IsTrue(field) => matches!(record.field(field), FieldValue::Bool(true)),
        Constraint::AnyOf { field, values } => record
            .field(field)
            .as_text()
            .is_some_and(|value| values.iter().any(|v| v == value)),
        Constraint::Overlaps { field, values } => match record.field(field) {
            FieldValue::List(items) => items.iter().any(|item| values.contains(item)),
            _ => false,
        },
        Constraint::ContainsAny { field, values } => {
            record.field(field).as_text().is_some_and(|value| {
                let value = value.to_lowercase();
                values.iter().any(|v| value.contains(&v.to_lowercase()))
            })
        }
        Constraint::AtLeast { field, value } => {
            matches!(record.field(field), FieldValue::Number(Some(n)) if n >= *value)
        }
        Constraint::AtMost { field, value } => {
            matches!(record.field(field), FieldValue::Number(Some(n)) if n <= *value)
        }
        Constraint::Between { field, start, end } => match record.field(field) {
            FieldValue::Timestamp(Some(at)) => {
                start.map_or(true, |start| at >= start) && end.map_or(true, |end| at <= end)
            }
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::records::JobRecord;
    use time::{Duration, OffsetDateTime};

    fn job(id: &str, title: &str, days_old: i64) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: title.to_string(),
            is_active: true,
            created_at: Some(OffsetDateTime::now_utc() - Duration::days(days_old)),
            ..Default::default()
        }
    }

    fn query(text: Option<&str>, constraints: Vec<Constraint>) -> CollectionQuery {
        CollectionQuery {
            text: text.map(str::to_string),
            text_fields: JobRecord::TEXT_FIELDS,
            constraints,
            limit: 10,
        }
    }

    #[tokio::test]
    async fn fetch_filters_by_text() {
        let store = MockContentStore::new().with_records(vec![
            job("1", "Solar Installer", 1),
            job("2", "Wind Technician", 1),
        ]);

        let records = store.fetch(&query(Some("SOLAR"), vec![])).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[tokio::test]
    async fn fetch_applies_constraints() {
        let mut inactive = job("2", "Solar Sales", 1);
        inactive.is_active = false;
        let store = MockContentStore::new().with_records(vec![job("1", "Solar Installer", 1), inactive]);

        let records = store
            .fetch(&query(None, vec![Constraint::IsTrue("is_active")]))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[tokio::test]
    async fn fetch_orders_newest_first_and_caps() {
        let store = MockContentStore::new().with_records(vec![
            job("old", "A", 30),
            job("new", "B", 1),
            job("mid", "C", 10),
        ]);

        let mut request = query(None, vec![]);
        request.limit = 2;
        let records = store.fetch(&request).await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn failing_store_returns_error() {
        let store = MockContentStore::<JobRecord>::failing("connection refused");
        let err = store.fetch(&query(None, vec![])).await.unwrap_err();
        assert!(matches!(err, SearchError::DatabaseError(_)));
        assert_eq!(store.call_count(), 1);
    }
}
