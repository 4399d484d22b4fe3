//! `SeaORM` implementation of the `RfqService` trait.

use crate::config::Config;
use crate::db::Store;
use crate::domain::Principal;
use crate::models::{NewRfq, Page, PageMeta, Rfq, RfqFilter, RfqStatus, RfqUpdate};
use crate::services::error::bounded;
use crate::services::rfq_service::{
    LIST_DEFAULT_LIMIT, LIST_MAX_LIMIT, RELATED_LIMIT, RfqService, validate_rfq,
};
use crate::services::ServiceError;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct SeaOrmRfqService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmRfqService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    /// Loads the RFQ and checks that `actor` owns it.
    async fn owned(&self, id: i32, actor: &Principal) -> Result<Rfq, ServiceError> {
        let rfq = self.get(id).await?;
        if rfq.buyer_id != actor.id {
            return Err(ServiceError::unauthorized(
                "only the buyer who posted this RFQ can modify it",
            ));
        }
        Ok(rfq)
    }

    async fn default_currency(&self) -> String {
        self.config.read().await.marketplace.default_currency.clone()
    }
}

#[async_trait::async_trait]
impl RfqService for SeaOrmRfqService {
    async fn list(&self, filter: RfqFilter) -> Result<Page<Rfq>, ServiceError> {
        let limit = bounded("limit", filter.limit, LIST_DEFAULT_LIMIT, 1, LIST_MAX_LIMIT)?;
        let offset = filter.offset.unwrap_or(0);

        let (items, total) = self.store.list_rfqs(&filter, limit, offset).await?;

        Ok(Page {
            items,
            meta: PageMeta::new(total, limit, offset),
        })
    }

    async fn get(&self, id: i32) -> Result<Rfq, ServiceError> {
        self.store
            .get_rfq(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", id))
    }

    async fn create(&self, buyer: &Principal, input: NewRfq) -> Result<Rfq, ServiceError> {
        if buyer.id <= 0 {
            return Err(ServiceError::validation("buyer id is required"));
        }
        if !buyer.can_post_rfq() {
            return Err(ServiceError::unauthorized("only buyers can post RFQs"));
        }

        let fields = validate_rfq(input, &self.default_currency().await)?;
        let rfq = self.store.insert_rfq(buyer.id, &fields).await?;

        metrics::counter!("rfq_created_total").increment(1);
        info!(rfq_id = rfq.id, buyer_id = buyer.id, "RFQ created");

        Ok(rfq)
    }

    async fn update(
        &self,
        id: i32,
        update: RfqUpdate,
        actor: &Principal,
    ) -> Result<Rfq, ServiceError> {
        let current = self.owned(id, actor).await?;

        if update.is_empty() {
            return Ok(current);
        }

        let merged = update.merge_onto(&current);
        let fields = validate_rfq(merged, &self.default_currency().await)?;
        let rfq = self.store.update_rfq(id, &fields).await?;

        info!(rfq_id = id, "RFQ updated");
        Ok(rfq)
    }

    async fn close(&self, id: i32, actor: &Principal) -> Result<Rfq, ServiceError> {
        let current = self.owned(id, actor).await?;

        if current.status == RfqStatus::Closed {
            return Ok(current);
        }

        let rfq = self
            .store
            .set_rfq_status(id, RfqStatus::Closed)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", id))?;

        metrics::counter!("rfq_closed_total").increment(1);
        info!(rfq_id = id, "RFQ closed by buyer");

        Ok(rfq)
    }

    async fn find_related(&self, id: i32) -> Result<Vec<Rfq>, ServiceError> {
        let Some(rfq) = self.store.get_rfq(id).await? else {
            return Ok(Vec::new());
        };

        Ok(self.store.find_related_rfqs(&rfq, RELATED_LIMIT).await?)
    }
}
