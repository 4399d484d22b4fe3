//! Domain service for the RFQ lifecycle.
//!
//! RFQs are created open by a buyer, mutated only by that buyer, and closed
//! either explicitly or as a side effect of awarding a bid.

use crate::db::RfqFields;
use crate::domain::Principal;
use crate::domain::text::sanitize_text;
use crate::models::{NewRfq, Page, Rfq, RfqFilter, RfqUpdate};
use crate::services::ServiceError;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

pub const LIST_DEFAULT_LIMIT: u64 = 20;
pub const LIST_MAX_LIMIT: u64 = 100;
pub const RELATED_LIMIT: u64 = 10;

/// Domain service trait for RFQs.
#[async_trait::async_trait]
pub trait RfqService: Send + Sync {
    /// Page of RFQs, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when `limit` is outside 1..=100.
    async fn list(&self, filter: RfqFilter) -> Result<Page<Rfq>, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no RFQ has this id.
    async fn get(&self, id: i32) -> Result<Rfq, ServiceError>;

    /// Posts a new open RFQ owned by `buyer`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] for bad titles, descriptions, budgets or currency
    /// - [`ServiceError::Unauthorized`] when the caller's role cannot post RFQs
    async fn create(&self, buyer: &Principal, input: NewRfq) -> Result<Rfq, ServiceError>;

    /// Partially updates an RFQ; the merged field set is validated like `create`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] when the RFQ is absent
    /// - [`ServiceError::Unauthorized`] when `actor` is not the owning buyer
    /// - [`ServiceError::Validation`] when the merged fields are invalid
    async fn update(&self, id: i32, update: RfqUpdate, actor: &Principal)
    -> Result<Rfq, ServiceError>;

    /// Closes an RFQ. Closing a closed RFQ returns it unchanged.
    ///
    /// # Errors
    ///
    /// Same ownership errors as [`RfqService::update`].
    async fn close(&self, id: i32, actor: &Principal) -> Result<Rfq, ServiceError>;

    /// Up to ten other open RFQs in the same category, newest first.
    /// Empty when the RFQ or its category is absent.
    async fn find_related(&self, id: i32) -> Result<Vec<Rfq>, ServiceError>;
}

pub(crate) fn check_budget(name: &str, value: Option<f64>) -> Result<(), ServiceError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ServiceError::validation(format!(
            "{name} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

fn check_reference(name: &str, value: Option<i32>) -> Result<(), ServiceError> {
    match value {
        Some(v) if v <= 0 => Err(ServiceError::validation(format!(
            "{name} must be a positive integer"
        ))),
        _ => Ok(()),
    }
}

/// Normalizes a currency code to upper case, requiring three ASCII letters.
pub fn normalize_currency(raw: Option<&str>, default: &str) -> Result<String, ServiceError> {
    let code = raw.map_or(default, str::trim).to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ServiceError::validation(
            "currency must be a 3-letter code",
        ));
    }
    Ok(code)
}

/// Validates and normalizes the full RFQ field set.
pub fn validate_rfq(input: NewRfq, default_currency: &str) -> Result<RfqFields, ServiceError> {
    let title = sanitize_text(&input.title, TITLE_MAX_CHARS, false);
    if title.chars().count() < TITLE_MIN_CHARS {
        return Err(ServiceError::validation(format!(
            "title must be at least {TITLE_MIN_CHARS} characters"
        )));
    }

    let description = sanitize_text(&input.description, DESCRIPTION_MAX_CHARS, true);
    if description.chars().count() < DESCRIPTION_MIN_CHARS {
        return Err(ServiceError::validation(format!(
            "description must be at least {DESCRIPTION_MIN_CHARS} characters"
        )));
    }

    check_budget("budget_min", input.budget_min)?;
    check_budget("budget_max", input.budget_max)?;
    if let (Some(min), Some(max)) = (input.budget_min, input.budget_max)
        && min > max
    {
        return Err(ServiceError::validation(
            "budget_min cannot be greater than budget_max",
        ));
    }

    check_reference("category_id", input.category_id)?;
    check_reference("subcategory_id", input.subcategory_id)?;

    let currency = normalize_currency(input.currency.as_deref(), default_currency)?;

    Ok(RfqFields {
        title,
        description,
        category_id: input.category_id,
        subcategory_id: input.subcategory_id,
        budget_min: input.budget_min,
        budget_max: input.budget_max,
        currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewRfq {
        NewRfq {
            title: "Logo design".to_string(),
            description: "Need a new logo for a bakery".to_string(),
            budget_min: Some(100.0),
            budget_max: Some(500.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input_defaults_currency() {
        let fields = validate_rfq(input(), "USD").unwrap();
        assert_eq!(fields.currency, "USD");
        assert_eq!(fields.title, "Logo design");
    }

    #[test]
    fn test_short_title_rejected() {
        let mut bad = input();
        bad.title = " ab ".to_string();
        assert!(matches!(
            validate_rfq(bad, "USD"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_short_description_rejected() {
        let mut bad = input();
        bad.description = "too short".to_string();
        assert!(validate_rfq(bad, "USD").is_err());
    }

    #[test]
    fn test_inverted_budget_rejected() {
        for (min, max) in [(500.0, 100.0), (1.0, 0.5), (10.0, 9.99)] {
            let mut bad = input();
            bad.budget_min = Some(min);
            bad.budget_max = Some(max);
            assert!(matches!(
                validate_rfq(bad, "USD"),
                Err(ServiceError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_single_budget_bound_allowed() {
        let mut one_sided = input();
        one_sided.budget_max = None;
        assert!(validate_rfq(one_sided, "USD").is_ok());
    }

    #[test]
    fn test_negative_or_nan_budget_rejected() {
        let mut bad = input();
        bad.budget_min = Some(-1.0);
        assert!(validate_rfq(bad, "USD").is_err());

        let mut bad = input();
        bad.budget_max = Some(f64::NAN);
        assert!(validate_rfq(bad, "USD").is_err());
    }

    #[test]
    fn test_currency_normalization() {
        assert_eq!(normalize_currency(Some(" eur "), "USD").unwrap(), "EUR");
        assert!(normalize_currency(Some("EURO"), "USD").is_err());
        assert!(normalize_currency(Some("U$D"), "USD").is_err());
    }
}
