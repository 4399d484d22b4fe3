use super::BidStatus;
use crate::entities::bids;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: i32,
    pub rfq_id: i32,
    pub vendor_id: i32,
    pub amount: f64,
    pub description: String,
    pub delivery_time: Option<i32>,
    pub status: BidStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<bids::Model> for Bid {
    fn from(m: bids::Model) -> Self {
        Self {
            id: m.id,
            rfq_id: m.rfq_id,
            vendor_id: m.vendor_id,
            amount: m.amount,
            description: m.description,
            delivery_time: m.delivery_time,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBid {
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub delivery_time: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BidUpdate {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub delivery_time: Option<i32>,
}

impl BidUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none() && self.delivery_time.is_none()
    }
}

/// A bid as seen by a particular viewer. Pricing details are sealed from
/// everyone except the RFQ owner and the bidding vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidView {
    pub id: i32,
    pub rfq_id: i32,
    pub vendor_id: i32,
    pub status: BidStatus,
    pub sealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<i32>,
    pub created_at: String,
}

impl BidView {
    #[must_use]
    pub fn full(bid: Bid) -> Self {
        Self {
            id: bid.id,
            rfq_id: bid.rfq_id,
            vendor_id: bid.vendor_id,
            status: bid.status,
            sealed: false,
            amount: Some(bid.amount),
            description: Some(bid.description),
            delivery_time: bid.delivery_time,
            created_at: bid.created_at,
        }
    }

    #[must_use]
    pub fn sealed(bid: Bid) -> Self {
        Self {
            id: bid.id,
            rfq_id: bid.rfq_id,
            vendor_id: bid.vendor_id,
            status: bid.status,
            sealed: true,
            amount: None,
            description: None,
            delivery_time: None,
            created_at: bid.created_at,
        }
    }
}
