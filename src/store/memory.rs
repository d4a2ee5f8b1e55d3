use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InfluencerPage, InfluencerStore};
use crate::errors::StoreError;
use crate::models::{Influencer, NewInfluencer};
use crate::query::{Column, InfluencerQuery, Order};

/// In-process influencer store.
///
/// Mirrors the `influencers` table: same column defaults, same unique keys,
/// same filtering and ordering. Used for local runs without a database and
/// in tests.
#[derive(Default)]
pub struct MemoryInfluencerStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: Vec<Influencer>,
    last_created_at: Option<DateTime<Utc>>,
}

impl MemoryInfluencerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing rows, e.g. fixtures with chosen statuses and timestamps.
    pub fn with_rows(rows: Vec<Influencer>) -> Self {
        let last_created_at = rows.iter().map(|r| r.created_at).max();
        Self {
            inner: RwLock::new(Inner {
                rows,
                last_created_at,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl InfluencerStore for MemoryInfluencerStore {
    async fn find(&self, query: &InfluencerQuery) -> Result<InfluencerPage, StoreError> {
        let inner = self.inner.read().await;

        let mut matching: Vec<&Influencer> =
            inner.rows.iter().filter(|row| query.matches(row)).collect();
        matching.sort_by(|a, b| compare(a, b, query.order));

        let total = matching.len() as i64;
        let offset = usize::try_from(query.range.offset).unwrap_or(usize::MAX);
        let count = usize::try_from(query.range.count).unwrap_or(0);

        let rows = matching
            .into_iter()
            .skip(offset)
            .take(count)
            .cloned()
            .collect();

        Ok(InfluencerPage { rows, total })
    }

    async fn insert(&self, new: NewInfluencer) -> Result<Influencer, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.rows.iter().any(|r| r.email == new.email) {
            return Err(StoreError::Duplicate("influencers_email_key".to_string()));
        }
        if inner
            .rows
            .iter()
            .any(|r| r.affiliate_code == new.affiliate_code)
        {
            return Err(StoreError::Duplicate(
                "influencers_affiliate_code_key".to_string(),
            ));
        }

        // Strictly increasing so that "newest first" is a total order.
        let now = Utc::now();
        let created_at = match inner.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        inner.last_created_at = Some(created_at);

        let influencer = Influencer {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            bio: new.bio,
            affiliate_code: new.affiliate_code,
            commission_rate: new.commission_rate,
            total_earnings: BigDecimal::from(0),
            remaining_balance: BigDecimal::from(0),
            total_clicks: 0,
            total_signups: 0,
            total_purchases: 0,
            conversion_rate: BigDecimal::from(0),
            status: Some("active".to_string()),
            is_india: new.is_india,
            created_at,
        };

        inner.rows.push(influencer.clone());
        Ok(influencer)
    }
}

fn compare(a: &Influencer, b: &Influencer, order: Order) -> Ordering {
    let primary = match order.column {
        Column::Name => a.name.cmp(&b.name),
        Column::Email => a.email.cmp(&b.email),
        Column::Status => a.status.cmp(&b.status),
        Column::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    let ordering = primary.then_with(|| a.id.cmp(&b.id));

    if order.ascending {
        ordering
    } else {
        ordering.reverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_commission_rate;

    fn new_influencer(name: &str, email: &str, code: &str) -> NewInfluencer {
        NewInfluencer {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            bio: None,
            affiliate_code: code.to_string(),
            commission_rate: default_commission_rate(),
            is_india: false,
        }
    }

    #[tokio::test]
    async fn test_insert_applies_column_defaults() {
        let store = MemoryInfluencerStore::new();
        let row = store
            .insert(new_influencer("Asha", "asha@example.com", "ASHA"))
            .await
            .unwrap();

        assert_eq!(row.status.as_deref(), Some("active"));
        assert_eq!(row.total_clicks, 0);
        assert_eq!(row.total_earnings, BigDecimal::from(0));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unique_keys() {
        let store = MemoryInfluencerStore::new();
        store
            .insert(new_influencer("Asha", "asha@example.com", "ASHA"))
            .await
            .unwrap();

        let same_email = store
            .insert(new_influencer("Other", "asha@example.com", "OTHER"))
            .await
            .unwrap_err();
        assert!(same_email.is_duplicate());

        let same_code = store
            .insert(new_influencer("Other", "other@example.com", "ASHA"))
            .await
            .unwrap_err();
        assert!(same_code.is_duplicate());

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_newest_first_and_window() {
        let store = MemoryInfluencerStore::new();
        for i in 0..5 {
            store
                .insert(new_influencer(
                    &format!("User {}", i),
                    &format!("user{}@example.com", i),
                    &format!("CODE{}", i),
                ))
                .await
                .unwrap();
        }

        let page = store
            .find(&InfluencerQuery::new().page(2, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        let names: Vec<_> = page.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["User 2", "User 1"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_name_and_email() {
        let store = MemoryInfluencerStore::new();
        store
            .insert(new_influencer("Foo Fighter", "a@example.com", "A"))
            .await
            .unwrap();
        store
            .insert(new_influencer("Bar", "FOO@example.com", "B"))
            .await
            .unwrap();
        store
            .insert(new_influencer("Baz", "baz@example.com", "C"))
            .await
            .unwrap();

        let query = InfluencerQuery::new().any_contains(&[Column::Name, Column::Email], "foo");
        let page = store.find(&query).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.rows.iter().all(|r| r.name != "Baz"));
    }
}
