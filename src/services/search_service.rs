//! Ranked search over open RFQs, keyword suggestions and keyword lookup.

use crate::models::{KeywordSuggestion, Page, Rfq, SearchHit, SearchParams};
use crate::services::ServiceError;
use std::cmp::Ordering;

pub const SUGGEST_DEFAULT_LIMIT: u64 = 10;
pub const SUGGEST_MAX_LIMIT: u64 = 20;

/// Domain service trait for discovery.
#[async_trait::async_trait]
pub trait SearchService: Send + Sync {
    /// Ranked search. Non-empty queries are forwarded to the trend tracker
    /// in the background; tracker failures never reach the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when `limit` is outside 1..=50,
    /// when `offset` exceeds 1000, or when a budget filter is negative.
    async fn search(&self, params: SearchParams) -> Result<Page<SearchHit>, ServiceError>;

    /// Keywords containing `partial`, most searched first. Fragments shorter
    /// than two characters yield an empty list without touching the store.
    async fn suggest(
        &self,
        partial: &str,
        limit: Option<u64>,
    ) -> Result<Vec<KeywordSuggestion>, ServiceError>;

    /// RFQs carrying any of `keywords`, newest first.
    async fn find_by_keywords(
        &self,
        keywords: &[String],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Page<Rfq>, ServiceError>;
}

fn occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        0
    } else {
        haystack.matches(needle).count()
    }
}

/// Relevance of an RFQ for already lower-cased `terms`.
///
/// Title hits weigh twice as much as description hits; the sum is damped by
/// document length so short focused requests outrank long ones.
#[must_use]
pub fn relevance(rfq: &Rfq, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    let title = rfq.title.to_lowercase();
    let description = rfq.description.to_lowercase();

    let hits: usize = terms
        .iter()
        .map(|t| 2 * occurrences(&title, t) + occurrences(&description, t))
        .sum();

    let words = title.split_whitespace().count() + description.split_whitespace().count();

    #[allow(clippy::cast_precision_loss)]
    let score = hits as f64 / (1.0 + (1.0 + words as f64).ln());
    score
}

/// Score descending, then newest first, then highest id.
pub fn rank(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.rfq.created_at.cmp(&a.rfq.created_at))
            .then_with(|| b.rfq.id.cmp(&a.rfq.id))
    });
}
