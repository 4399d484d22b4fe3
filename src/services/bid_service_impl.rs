//! `SeaORM` implementation of the `BidService` trait.

use crate::config::Config;
use crate::db::{AwardOutcome, Store};
use crate::domain::Principal;
use crate::models::{Bid, BidStatus, BidUpdate, BidView, NewBid, Rfq};
use crate::services::ServiceError;
use crate::services::bid_service::{
    Award, BidService, project, validate_bid_update, validate_new_bid,
};
use sea_orm::SqlErr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct SeaOrmBidService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmBidService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    /// Loads the bid and checks that `actor` is the vendor who placed it.
    async fn owned(&self, bid_id: i32, actor: &Principal) -> Result<Bid, ServiceError> {
        let bid = self.get(bid_id).await?;
        if bid.vendor_id != actor.id {
            return Err(ServiceError::unauthorized(
                "only the vendor who placed this bid can change it",
            ));
        }
        Ok(bid)
    }

    /// Rejects `amount` outside the RFQ budget when bounds are enforced.
    async fn check_budget(&self, rfq: &Rfq, amount: f64) -> Result<(), ServiceError> {
        let enforce = self.config.read().await.marketplace.enforce_budget_bounds;
        if enforce && !rfq.budget_allows(amount) {
            return Err(ServiceError::validation(
                "amount must fall within the RFQ budget range",
            ));
        }
        Ok(())
    }

    fn duplicate_bid() -> ServiceError {
        ServiceError::conflict("vendor already has an active bid on this RFQ")
    }
}

#[async_trait::async_trait]
impl BidService for SeaOrmBidService {
    async fn create(
        &self,
        rfq_id: i32,
        vendor: &Principal,
        input: NewBid,
    ) -> Result<Bid, ServiceError> {
        if !vendor.can_bid() {
            return Err(ServiceError::unauthorized("only vendors can submit bids"));
        }

        let fields = validate_new_bid(&input)?;

        let rfq = self
            .store
            .get_rfq(rfq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", rfq_id))?;

        if !rfq.is_open() {
            return Err(ServiceError::conflict("RFQ is not open for bidding"));
        }

        if rfq.buyer_id == vendor.id {
            return Err(ServiceError::unauthorized("cannot bid on your own RFQ"));
        }

        self.check_budget(&rfq, input.amount).await?;

        if self.store.find_active_bid(rfq_id, vendor.id).await?.is_some() {
            return Err(Self::duplicate_bid());
        }

        let bid = match self.store.insert_bid(rfq_id, vendor.id, &fields).await {
            Ok(bid) => bid,
            // Lost a race against a concurrent submission by the same vendor.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(Self::duplicate_bid());
            }
            Err(err) => return Err(err.into()),
        };

        metrics::counter!("bids_submitted_total").increment(1);
        info!(bid_id = bid.id, rfq_id, vendor_id = vendor.id, "Bid submitted");

        Ok(bid)
    }

    async fn get(&self, bid_id: i32) -> Result<Bid, ServiceError> {
        self.store
            .get_bid(bid_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Bid", bid_id))
    }

    async fn list_for_rfq(
        &self,
        rfq_id: i32,
        viewer: Option<&Principal>,
    ) -> Result<Vec<BidView>, ServiceError> {
        let rfq = self
            .store
            .get_rfq(rfq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", rfq_id))?;

        let bids = self.store.list_bids_for_rfq(rfq_id).await?;

        Ok(bids
            .into_iter()
            .map(|bid| project(&rfq, bid, viewer))
            .collect())
    }

    async fn view(
        &self,
        bid_id: i32,
        viewer: Option<&Principal>,
    ) -> Result<BidView, ServiceError> {
        let bid = self.get(bid_id).await?;
        let rfq = self
            .store
            .get_rfq(bid.rfq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", bid.rfq_id))?;

        Ok(project(&rfq, bid, viewer))
    }

    async fn update(
        &self,
        bid_id: i32,
        update: BidUpdate,
        actor: &Principal,
    ) -> Result<Bid, ServiceError> {
        let bid = self.owned(bid_id, actor).await?;

        if bid.status.is_terminal() {
            return Err(ServiceError::conflict(format!(
                "cannot edit a bid in '{}' state",
                bid.status.as_str()
            )));
        }

        let fields = validate_bid_update(&update)?;

        if let Some(amount) = fields.amount {
            let rfq = self
                .store
                .get_rfq(bid.rfq_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("RFQ", bid.rfq_id))?;
            self.check_budget(&rfq, amount).await?;
        }

        self.store
            .update_submitted_bid(bid_id, &fields)
            .await?
            .ok_or_else(|| ServiceError::conflict("bid is no longer in submitted state"))
    }

    async fn award(&self, bid_id: i32, actor: &Principal) -> Result<Award, ServiceError> {
        let bid = self.get(bid_id).await?;

        let rfq = self
            .store
            .get_rfq(bid.rfq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", bid.rfq_id))?;

        if rfq.buyer_id != actor.id {
            return Err(ServiceError::unauthorized(
                "only the buyer who posted this RFQ can award bids",
            ));
        }

        if !rfq.is_open() {
            metrics::counter!("award_conflicts_total").increment(1);
            return Err(ServiceError::conflict("RFQ is not open"));
        }

        if bid.status != BidStatus::Submitted {
            metrics::counter!("award_conflicts_total").increment(1);
            return Err(ServiceError::conflict(format!(
                "cannot award a bid in '{}' state",
                bid.status.as_str()
            )));
        }

        let rejected_bids = match self.store.award_bid(bid_id, rfq.id).await? {
            AwardOutcome::Awarded { rejected } => rejected,
            AwardOutcome::RfqNotOpen => {
                metrics::counter!("award_conflicts_total").increment(1);
                warn!(bid_id, rfq_id = rfq.id, "Award lost to a concurrent award");
                return Err(ServiceError::conflict("RFQ is not open"));
            }
            AwardOutcome::BidNotSubmitted => {
                metrics::counter!("award_conflicts_total").increment(1);
                return Err(ServiceError::conflict("bid is no longer in submitted state"));
            }
        };

        metrics::counter!("bids_awarded_total").increment(1);
        info!(bid_id, rfq_id = rfq.id, rejected_bids, "Bid awarded, RFQ closed");

        let bid = self.get(bid_id).await?;
        let rfq = self
            .store
            .get_rfq(rfq.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", rfq.id))?;

        Ok(Award {
            bid,
            rfq,
            rejected_bids,
        })
    }

    async fn retract(&self, bid_id: i32, actor: &Principal) -> Result<Bid, ServiceError> {
        let bid = self.owned(bid_id, actor).await?;

        match bid.status {
            BidStatus::Submitted => {}
            BidStatus::Awarded => {
                return Err(ServiceError::conflict("cannot retract an awarded bid"));
            }
            other => {
                return Err(ServiceError::conflict(format!(
                    "bid is already {}",
                    other.as_str()
                )));
            }
        }

        let bid = self
            .store
            .retract_bid(bid_id)
            .await?
            .ok_or_else(|| ServiceError::conflict("bid is no longer in submitted state"))?;

        metrics::counter!("bids_retracted_total").increment(1);
        info!(bid_id, vendor_id = actor.id, "Bid retracted");

        Ok(bid)
    }
}
