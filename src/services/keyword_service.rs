//! Domain service for keyword associations between RFQs and search terms.

use crate::domain::Principal;
use crate::services::ServiceError;

/// Domain service trait for RFQ keywords.
///
/// Keywords are normalized (trimmed, lower-cased, at most 50 characters)
/// before they touch the store, so callers may pass raw user input.
#[async_trait::async_trait]
pub trait KeywordService: Send + Sync {
    /// Alphabetically sorted distinct keywords of an RFQ.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the RFQ does not exist.
    async fn list(&self, rfq_id: i32) -> Result<Vec<String>, ServiceError>;

    /// Associates keywords with an RFQ in one transaction. Already associated
    /// keywords are skipped. Returns the resulting keyword list.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] when the RFQ does not exist.
    /// - [`ServiceError::Unauthorized`] unless `actor` posted the RFQ.
    /// - [`ServiceError::Validation`] when no usable keyword remains after normalization.
    async fn add(
        &self,
        rfq_id: i32,
        keywords: &[String],
        actor: &Principal,
    ) -> Result<Vec<String>, ServiceError>;

    /// Removes keywords in one transaction; unknown keywords are ignored.
    /// Returns the resulting keyword list.
    async fn remove(
        &self,
        rfq_id: i32,
        keywords: &[String],
        actor: &Principal,
    ) -> Result<Vec<String>, ServiceError>;
}

/// Normalizes a keyword batch and enforces the per-request cap.
pub fn prepare_keywords(raw: &[String], max: usize) -> Result<Vec<String>, ServiceError> {
    if raw.len() > max {
        return Err(ServiceError::validation(format!(
            "at most {max} keywords per request"
        )));
    }

    let keywords = crate::domain::text::normalize_keywords(raw);
    if keywords.is_empty() {
        return Err(ServiceError::validation("at least one keyword is required"));
    }
    Ok(keywords)
}
