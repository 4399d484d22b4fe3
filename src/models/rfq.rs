use super::RfqStatus;
use crate::entities::rfqs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfq {
    pub id: i32,
    pub buyer_id: i32,
    pub title: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub currency: String,
    pub status: RfqStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Rfq {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == RfqStatus::Open
    }

    #[must_use]
    pub fn budget_allows(&self, amount: f64) -> bool {
        self.budget_min.is_none_or(|min| amount >= min)
            && self.budget_max.is_none_or(|max| amount <= max)
    }
}

impl From<rfqs::Model> for Rfq {
    fn from(m: rfqs::Model) -> Self {
        Self {
            id: m.id,
            buyer_id: m.buyer_id,
            title: m.title,
            description: m.description,
            category_id: m.category_id,
            subcategory_id: m.subcategory_id,
            budget_min: m.budget_min,
            budget_max: m.budget_max,
            currency: m.currency,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Fields supplied when posting an RFQ.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRfq {
    pub title: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub currency: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RfqUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub currency: Option<String>,
}

impl RfqUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.subcategory_id.is_none()
            && self.budget_min.is_none()
            && self.budget_max.is_none()
            && self.currency.is_none()
    }

    /// Overlays this update on an existing RFQ, yielding the full field set
    /// that must pass validation.
    #[must_use]
    pub fn merge_onto(self, current: &Rfq) -> NewRfq {
        NewRfq {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            category_id: self.category_id.or(current.category_id),
            subcategory_id: self.subcategory_id.or(current.subcategory_id),
            budget_min: self.budget_min.or(current.budget_min),
            budget_max: self.budget_max.or(current.budget_max),
            currency: Some(self.currency.unwrap_or_else(|| current.currency.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RfqFilter {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub category_id: Option<i32>,
    pub buyer_id: Option<i32>,
    pub status: Option<RfqStatus>,
}
