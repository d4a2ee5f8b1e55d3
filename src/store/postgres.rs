use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{InfluencerPage, InfluencerStore};
use crate::errors::StoreError;
use crate::models::{Influencer, NewInfluencer};
use crate::query::{InfluencerQuery, Order, Predicate};

const COLUMNS: &str = "id, name, email, phone, bio, affiliate_code, commission_rate, \
     total_earnings, remaining_balance, total_clicks, total_signups, total_purchases, \
     conversion_rate, status, is_india, created_at";

/// Influencer store backed by the `influencers` table in Postgres.
#[derive(Clone)]
pub struct PgInfluencerStore {
    pool: PgPool,
}

impl PgInfluencerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InfluencerStore for PgInfluencerStore {
    async fn find(&self, query: &InfluencerQuery) -> Result<InfluencerPage, StoreError> {
        let mut count_query = count_sql(query);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut rows_query = select_sql(query);
        tracing::debug!("Executing SQL: {}", rows_query.sql());
        let rows = rows_query
            .build_query_as::<Influencer>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Fetched {} of {} matching influencers", rows.len(), total);
        Ok(InfluencerPage { rows, total })
    }

    async fn insert(&self, new: NewInfluencer) -> Result<Influencer, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO influencers
                (name, email, phone, bio, affiliate_code, commission_rate, is_india)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            COLUMNS
        );

        let influencer = sqlx::query_as::<_, Influencer>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(&new.bio)
            .bind(&new.affiliate_code)
            .bind(&new.commission_rate)
            .bind(new.is_india)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Inserted influencer {} ({})", influencer.id, influencer.affiliate_code);
        Ok(influencer)
    }
}

fn count_sql(query: &InfluencerQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM influencers WHERE 1=1");
    push_predicates(&mut builder, &query.predicates);
    builder
}

fn select_sql(query: &InfluencerQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM influencers WHERE 1=1", COLUMNS));
    push_predicates(&mut builder, &query.predicates);
    push_order(&mut builder, query.order);

    builder.push(" LIMIT ");
    builder.push_bind(query.range.count);
    builder.push(" OFFSET ");
    builder.push_bind(query.range.offset);
    builder
}

fn push_predicates(builder: &mut QueryBuilder<'static, Postgres>, predicates: &[Predicate]) {
    for predicate in predicates {
        match predicate {
            Predicate::Equals { column, value } => {
                builder.push(" AND ");
                builder.push(column.as_sql());
                builder.push(" = ");
                builder.push_bind(value.clone());
            }
            Predicate::AnyContains { columns, needle } => {
                if columns.is_empty() {
                    builder.push(" AND FALSE");
                    continue;
                }
                let pattern = format!("%{}%", escape_like(needle));
                builder.push(" AND (");
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    builder.push(column.as_sql());
                    builder.push(" ILIKE ");
                    builder.push_bind(pattern.clone());
                }
                builder.push(")");
            }
        }
    }
}

// `id` breaks ties so that consecutive pages never overlap.
fn push_order(builder: &mut QueryBuilder<'static, Postgres>, order: Order) {
    let direction = if order.ascending { "ASC" } else { "DESC" };
    builder.push(format!(
        " ORDER BY {} {}, id {}",
        order.column.as_sql(),
        direction,
        direction
    ));
}

/// Escapes LIKE wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
