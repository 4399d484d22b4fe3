//! Domain service for search-query logging and keyword trends.

use crate::models::KeywordTrend;
use crate::services::ServiceError;

pub const QUERY_MIN_CHARS: usize = 2;
pub const QUERY_LOG_MAX_CHARS: usize = 200;

pub const TRENDING_DEFAULT_LIMIT: u64 = 10;
pub const MOST_SEARCHED_DEFAULT_LIMIT: u64 = 20;
pub const TREND_MAX_LIMIT: u64 = 50;

/// Domain service trait for keyword trends.
///
/// Trend rows are keyword-global and are only ever written through this trait.
#[async_trait::async_trait]
pub trait TrendService: Send + Sync {
    /// Logs a free-text query and counts a search hit for each token longer
    /// than two characters. Queries shorter than two characters are ignored.
    async fn track(&self, query_text: &str) -> Result<(), ServiceError>;

    /// Counts keywords that were just attached to an RFQ.
    async fn record_usage(&self, keywords: &[String]) -> Result<(), ServiceError>;

    /// Keywords searched within the recency window, by trend score then count.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when `limit` is outside 1..=50.
    async fn trending(&self, limit: Option<u64>) -> Result<Vec<KeywordTrend>, ServiceError>;

    /// All-time most searched keywords.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when `limit` is outside 1..=50.
    async fn most_searched(&self, limit: Option<u64>)
    -> Result<Vec<KeywordTrend>, ServiceError>;

    /// Deletes logged queries older than `older_than_days`; returns the number removed.
    async fn prune_queries(&self, older_than_days: i64) -> Result<u64, ServiceError>;
}
