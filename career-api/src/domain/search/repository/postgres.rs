//! PostgreSQL content store.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::domain::search::traits::{
    CollectionQuery, Constraint, ContentRecord, ContentStore, Result,
};

/// PostgreSQL-backed store for one content collection.
///
/// Translates a [`CollectionQuery`] into a single parameterized `SELECT`
/// against the record's table: `ILIKE` for text matching, `= ANY` for
/// any-of filters and `&&` for array overlap.
pub struct PgContentStore<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for PgContentStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<R> PgContentStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R> ContentStore<R> for PgContentStore<R>
where
    R: ContentRecord + for<'r> FromRow<'r, PgRow> + Unpin,
{
    async fn fetch(&self, query: &CollectionQuery) -> Result<Vec<R>> {
        let mut builder = build_select(R::COLLECTION, query);
        let records = builder.build_query_as::<R>().fetch_all(&self.pool).await?;
        Ok(records)
    }
}

/// Build the `SELECT` for `query` against `collection`.
///
/// Column names come from the record definitions; every value is bound.
fn build_select(collection: &str, query: &CollectionQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM ");
    builder.push(collection).push(" WHERE TRUE");

    if let Some(text) = query.text.as_deref().filter(|t| !t.is_empty()) {
        if !query.text_fields.is_empty() {
            let pattern = like_pattern(text);
            builder.push(" AND (");
            for (i, field) in query.text_fields.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(*field).push(" ILIKE ").push_bind(pattern.clone());
            }
            builder.push(")");
        }
    }

    for constraint in &query.constraints {
        builder.push(" AND ");
        push_constraint(&mut builder, constraint);
    }

    builder
        .push(" ORDER BY created_at DESC NULLS LAST LIMIT ")
        .push_bind(i64::try_from(query.limit).unwrap_or(i64::MAX));

    builder
}

fn push_constraint(builder: &mut QueryBuilder<'static, Postgres>, constraint: &Constraint) {
    match constraint {
        Constraint::IsTrue(field) => {
            builder.push(*field).push(" IS TRUE");
        }
        Constraint::AnyOf { field, values } => {
            builder
                .push(*field)
                .push(" = ANY(")
                .push_bind(values.clone())
                .push(")");
        }
        Constraint::Overlaps { field, values } => {
            builder.push(*field).push(" && ").push_bind(values.clone());
        }
        Constraint::ContainsAny { field, values } => {
            builder.push("(");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(*field).push(" ILIKE ").push_bind(like_pattern(value));
            }
            builder.push(")");
        }
        Constraint::AtLeast { field, value } => {
            builder.push(*field).push(" >= ").push_bind(*value);
        }
        Constraint::AtMost { field, value } => {
            builder.push(*field).push(" <= ").push_bind(*value);
        }
        Constraint::Between { field, start, end } => {
            builder.push("(").push(*field).push(" IS NOT NULL");
            if let Some(start) = start {
                builder.push(" AND ").push(*field).push(" >= ").push_bind(*start);
            }
            if let Some(end) = end {
                builder.push(" AND ").push(*field).push(" <= ").push_bind(*end);
            }
            builder.push(")");
        }
    }
}

/// `%text%` with LIKE wildcards in `text` escaped.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
