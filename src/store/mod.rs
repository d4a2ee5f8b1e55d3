//! Storage seam for influencer records.

mod memory;
mod postgres;

pub use memory::MemoryInfluencerStore;
pub use postgres::PgInfluencerStore;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{Influencer, NewInfluencer};
use crate::query::InfluencerQuery;

/// One page of a filtered read plus the exact number of matching rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfluencerPage {
    pub rows: Vec<Influencer>,
    pub total: i64,
}

/// Backing store for influencers.
///
/// Each call is a single round trip; uniqueness of `email` and
/// `affiliate_code` is enforced here, not by callers.
#[async_trait]
pub trait InfluencerStore: Send + Sync {
    /// Runs `query` and returns the requested window with the total match count.
    async fn find(&self, query: &InfluencerQuery) -> Result<InfluencerPage, StoreError>;

    /// Inserts one row and returns it as stored.
    async fn insert(&self, new: NewInfluencer) -> Result<Influencer, StoreError>;
}
