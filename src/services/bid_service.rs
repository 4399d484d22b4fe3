//! Domain service for the bid lifecycle.
//!
//! A bid starts `submitted` and ends in exactly one terminal state:
//! `awarded`, `rejected` (another bid won) or `retracted`.

use crate::db::BidFields;
use crate::domain::{Principal, Role};
use crate::domain::text::sanitize_text;
use crate::models::{Bid, BidUpdate, BidView, NewBid, Rfq};
use crate::services::ServiceError;
use serde::Serialize;

pub const BID_DESCRIPTION_MAX_CHARS: usize = 5000;

/// Outcome of a successful award.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Award {
    pub bid: Bid,
    pub rfq: Rfq,
    pub rejected_bids: u64,
}

/// Domain service trait for bids.
#[async_trait::async_trait]
pub trait BidService: Send + Sync {
    /// Submits a bid from `vendor` on an open RFQ.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] for non-positive amounts, bad delivery times
    ///   or amounts outside the RFQ budget
    /// - [`ServiceError::NotFound`] when the RFQ is absent
    /// - [`ServiceError::Unauthorized`] when the caller cannot bid or owns the RFQ
    /// - [`ServiceError::Conflict`] when the RFQ is closed or the vendor already
    ///   holds a live bid on it
    async fn create(&self, rfq_id: i32, vendor: &Principal, input: NewBid)
    -> Result<Bid, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no bid has this id.
    async fn get(&self, bid_id: i32) -> Result<Bid, ServiceError>;

    /// A single bid as seen by `viewer`.
    async fn view(&self, bid_id: i32, viewer: Option<&Principal>)
    -> Result<BidView, ServiceError>;

    /// Bids on an RFQ as seen by `viewer`; pricing is sealed from outsiders.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the RFQ is absent.
    async fn list_for_rfq(
        &self,
        rfq_id: i32,
        viewer: Option<&Principal>,
    ) -> Result<Vec<BidView>, ServiceError>;

    /// Edits a submitted bid.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Unauthorized`] unless `actor` placed the bid
    /// - [`ServiceError::Conflict`] once the bid left the `submitted` state
    /// - [`ServiceError::Validation`] when no field is present or a field is invalid
    async fn update(&self, bid_id: i32, update: BidUpdate, actor: &Principal)
    -> Result<Bid, ServiceError>;

    /// Awards a bid, rejects the competing submitted bids and closes the RFQ
    /// atomically. Only one award per RFQ can ever succeed.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] when the bid is absent
    /// - [`ServiceError::Unauthorized`] unless `actor` owns the RFQ
    /// - [`ServiceError::Conflict`] when the RFQ is not open or the bid is not submitted,
    ///   including losing a concurrent award race
    async fn award(&self, bid_id: i32, actor: &Principal) -> Result<Award, ServiceError>;

    /// Withdraws a submitted bid, letting the vendor bid again.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Unauthorized`] unless `actor` placed the bid
    /// - [`ServiceError::Conflict`] when the bid is awarded or otherwise terminal
    async fn retract(&self, bid_id: i32, actor: &Principal) -> Result<Bid, ServiceError>;
}

/// Whether `viewer` may see the sealed details of `bid` on `rfq`.
#[must_use]
pub fn can_see_details(rfq: &Rfq, bid: &Bid, viewer: Option<&Principal>) -> bool {
    viewer.is_some_and(|v| v.role == Role::Admin || v.id == rfq.buyer_id || v.id == bid.vendor_id)
}

/// Projects `bid` for `viewer`, sealing pricing when required.
#[must_use]
pub fn project(rfq: &Rfq, bid: Bid, viewer: Option<&Principal>) -> BidView {
    if can_see_details(rfq, &bid, viewer) {
        BidView::full(bid)
    } else {
        BidView::sealed(bid)
    }
}

pub fn validate_amount(amount: f64) -> Result<f64, ServiceError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ServiceError::validation("amount must be a positive number"));
    }
    Ok(amount)
}

pub fn validate_delivery_time(days: Option<i32>) -> Result<Option<i32>, ServiceError> {
    match days {
        Some(d) if d <= 0 => Err(ServiceError::validation(
            "delivery_time must be a positive number of days",
        )),
        other => Ok(other),
    }
}

/// Validates a new bid into storable fields.
pub fn validate_new_bid(input: &NewBid) -> Result<BidFields, ServiceError> {
    Ok(BidFields {
        amount: Some(validate_amount(input.amount)?),
        description: Some(
            input
                .description
                .as_deref()
                .map(|d| sanitize_text(d, BID_DESCRIPTION_MAX_CHARS, true))
                .unwrap_or_default(),
        ),
        delivery_time: validate_delivery_time(input.delivery_time)?,
    })
}

/// Validates a partial bid update into storable fields.
pub fn validate_bid_update(update: &BidUpdate) -> Result<BidFields, ServiceError> {
    if update.is_empty() {
        return Err(ServiceError::validation(
            "at least one of amount, description or delivery_time is required",
        ));
    }

    Ok(BidFields {
        amount: update.amount.map(validate_amount).transpose()?,
        description: update
            .description
            .as_deref()
            .map(|d| sanitize_text(d, BID_DESCRIPTION_MAX_CHARS, true)),
        delivery_time: validate_delivery_time(update.delivery_time)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_amounts_rejected() {
        for amount in [0.0, -0.01, -300.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                validate_amount(amount),
                Err(ServiceError::Validation(_))
            ));
        }
        assert!(validate_amount(0.01).is_ok());
    }

    #[test]
    fn test_delivery_time_must_be_positive() {
        assert!(validate_delivery_time(Some(0)).is_err());
        assert!(validate_delivery_time(Some(-3)).is_err());
        assert_eq!(validate_delivery_time(Some(14)).unwrap(), Some(14));
        assert_eq!(validate_delivery_time(None).unwrap(), None);
    }

    fn sample() -> (Rfq, Bid) {
        use crate::models::{BidStatus, RfqStatus};

        let rfq = Rfq {
            id: 1,
            buyer_id: 10,
            title: "Logo design".to_string(),
            description: "A logo for a bakery".to_string(),
            category_id: None,
            subcategory_id: None,
            budget_min: Some(100.0),
            budget_max: Some(500.0),
            currency: "USD".to_string(),
            status: RfqStatus::Open,
            created_at: "2026-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000000Z".to_string(),
        };
        let bid = Bid {
            id: 5,
            rfq_id: 1,
            vendor_id: 20,
            amount: 300.0,
            description: "Three concepts".to_string(),
            delivery_time: Some(7),
            status: BidStatus::Submitted,
            created_at: "2026-01-02T00:00:00.000000Z".to_string(),
            updated_at: "2026-01-02T00:00:00.000000Z".to_string(),
        };
        (rfq, bid)
    }

    #[test]
    fn test_bid_details_sealed_from_outsiders() {
        let (rfq, bid) = sample();

        let owner = Principal::new(10, Role::Buyer);
        let bidder = Principal::new(20, Role::Vendor);
        let rival = Principal::new(21, Role::Vendor);
        let admin = Principal::new(99, Role::Admin);

        assert!(can_see_details(&rfq, &bid, Some(&owner)));
        assert!(can_see_details(&rfq, &bid, Some(&bidder)));
        assert!(can_see_details(&rfq, &bid, Some(&admin)));
        assert!(!can_see_details(&rfq, &bid, Some(&rival)));
        assert!(!can_see_details(&rfq, &bid, None));

        let view = project(&rfq, bid, Some(&rival));
        assert!(view.sealed);
        assert_eq!(view.amount, None);
        assert_eq!(view.description, None);
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(validate_bid_update(&BidUpdate::default()).is_err());
    }

    #[test]
    fn test_update_only_sets_present_fields() {
        let fields = validate_bid_update(&BidUpdate {
            description: Some("  faster turnaround \u{0000}".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fields.amount, None);
        assert_eq!(fields.description.as_deref(), Some("faster turnaround"));
    }
}
