use crate::db::now;
use crate::entities::{bids, prelude::*, rfqs};
use crate::models::{Bid, BidStatus, RfqStatus};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

/// Validated bid fields. `None` leaves a column untouched on update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidFields {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub delivery_time: Option<i32>,
}

/// Result of the award transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    Awarded { rejected: u64 },
    /// Another award (or a close) got to the RFQ first.
    RfqNotOpen,
    BidNotSubmitted,
}

pub struct BidRepository {
    conn: DatabaseConnection,
}

impl BidRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the raw `DbErr` so callers can tell a unique-index violation
    /// (duplicate live bid) apart from other failures.
    pub async fn insert(
        &self,
        rfq_id: i32,
        vendor_id: i32,
        fields: &BidFields,
    ) -> Result<Bid, DbErr> {
        let timestamp = now();
        let model = bids::ActiveModel {
            rfq_id: Set(rfq_id),
            vendor_id: Set(vendor_id),
            amount: Set(fields.amount.unwrap_or_default()),
            description: Set(fields.description.clone().unwrap_or_default()),
            delivery_time: Set(fields.delivery_time),
            status: Set(BidStatus::Submitted),
            created_at: Set(timestamp.clone()),
            updated_at: Set(timestamp),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(Bid::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Bid>> {
        let row = Bids::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Bid::from))
    }

    pub async fn find_active(&self, rfq_id: i32, vendor_id: i32) -> Result<Option<Bid>> {
        let row = Bids::find()
            .filter(bids::Column::RfqId.eq(rfq_id))
            .filter(bids::Column::VendorId.eq(vendor_id))
            .filter(bids::Column::Status.ne(BidStatus::Retracted))
            .one(&self.conn)
            .await?;

        Ok(row.map(Bid::from))
    }

    pub async fn list_for_rfq(&self, rfq_id: i32) -> Result<Vec<Bid>> {
        let rows = Bids::find()
            .filter(bids::Column::RfqId.eq(rfq_id))
            .order_by_asc(bids::Column::CreatedAt)
            .order_by_asc(bids::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Bid::from).collect())
    }

    /// Applies the fields only while the bid is still `submitted`.
    /// Returns `None` when the guard did not match.
    pub async fn update_submitted(&self, id: i32, fields: &BidFields) -> Result<Option<Bid>> {
        let mut update = Bids::update_many()
            .col_expr(bids::Column::UpdatedAt, Expr::value(now()))
            .filter(bids::Column::Id.eq(id))
            .filter(bids::Column::Status.eq(BidStatus::Submitted));

        if let Some(amount) = fields.amount {
            update = update.col_expr(bids::Column::Amount, Expr::value(amount));
        }
        if let Some(description) = &fields.description {
            update = update.col_expr(bids::Column::Description, Expr::value(description.clone()));
        }
        if let Some(days) = fields.delivery_time {
            update = update.col_expr(bids::Column::DeliveryTime, Expr::value(days));
        }

        let result = update.exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    pub async fn retract(&self, id: i32) -> Result<Option<Bid>> {
        let result = Bids::update_many()
            .col_expr(bids::Column::Status, Expr::value(BidStatus::Retracted))
            .col_expr(bids::Column::UpdatedAt, Expr::value(now()))
            .filter(bids::Column::Id.eq(id))
            .filter(bids::Column::Status.eq(BidStatus::Submitted))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Awards `bid_id`, rejects every other submitted bid on the RFQ and closes
    /// the RFQ, all in one transaction.
    ///
    /// Each step is a conditional update; the first one to match zero rows
    /// rolls the whole transaction back. Closing the RFQ comes first so that
    /// concurrent awards serialize on the RFQ row and only one can win.
    pub async fn award(&self, bid_id: i32, rfq_id: i32) -> Result<AwardOutcome> {
        let txn = self.conn.begin().await?;
        let timestamp = now();

        let closed = Rfqs::update_many()
            .col_expr(rfqs::Column::Status, Expr::value(RfqStatus::Closed))
            .col_expr(rfqs::Column::UpdatedAt, Expr::value(timestamp.clone()))
            .filter(rfqs::Column::Id.eq(rfq_id))
            .filter(rfqs::Column::Status.eq(RfqStatus::Open))
            .exec(&txn)
            .await?;

        if closed.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(AwardOutcome::RfqNotOpen);
        }

        let awarded = Bids::update_many()
            .col_expr(bids::Column::Status, Expr::value(BidStatus::Awarded))
            .col_expr(bids::Column::UpdatedAt, Expr::value(timestamp.clone()))
            .filter(bids::Column::Id.eq(bid_id))
            .filter(bids::Column::RfqId.eq(rfq_id))
            .filter(bids::Column::Status.eq(BidStatus::Submitted))
            .exec(&txn)
            .await?;

        if awarded.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(AwardOutcome::BidNotSubmitted);
        }

        let rejected = Bids::update_many()
            .col_expr(bids::Column::Status, Expr::value(BidStatus::Rejected))
            .col_expr(bids::Column::UpdatedAt, Expr::value(timestamp))
            .filter(bids::Column::RfqId.eq(rfq_id))
            .filter(bids::Column::Id.ne(bid_id))
            .filter(bids::Column::Status.eq(BidStatus::Submitted))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        debug!(
            "Bid {} awarded on RFQ {}, {} competing bids rejected",
            bid_id, rfq_id, rejected.rows_affected
        );

        Ok(AwardOutcome::Awarded {
            rejected: rejected.rows_affected,
        })
    }
}
