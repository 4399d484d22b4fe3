//! `SeaORM` implementation of the `KeywordService` trait.

use crate::config::Config;
use crate::db::Store;
use crate::domain::Principal;
use crate::models::Rfq;
use crate::services::ServiceError;
use crate::services::keyword_service::{KeywordService, prepare_keywords};
use crate::services::trend_service::TrendService;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct SeaOrmKeywordService {
    store: Store,
    trends: Arc<dyn TrendService>,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmKeywordService {
    #[must_use]
    pub fn new(store: Store, trends: Arc<dyn TrendService>, config: Arc<RwLock<Config>>) -> Self {
        Self {
            store,
            trends,
            config,
        }
    }

    async fn rfq(&self, rfq_id: i32) -> Result<Rfq, ServiceError> {
        self.store
            .get_rfq(rfq_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RFQ", rfq_id))
    }

    async fn owned(&self, rfq_id: i32, actor: &Principal) -> Result<Rfq, ServiceError> {
        let rfq = self.rfq(rfq_id).await?;
        if rfq.buyer_id != actor.id {
            return Err(ServiceError::unauthorized(
                "only the buyer who posted this RFQ can change its keywords",
            ));
        }
        Ok(rfq)
    }

    async fn max_per_request(&self) -> usize {
        self.config.read().await.marketplace.max_keywords_per_request
    }

    fn report_usage(&self, inserted: Vec<String>) {
        if inserted.is_empty() {
            return;
        }

        let trends = Arc::clone(&self.trends);
        tokio::spawn(async move {
            if let Err(e) = trends.record_usage(&inserted).await {
                metrics::counter!("trend_tracking_failures_total").increment(1);
                warn!(error = %e, "Failed to record keyword usage");
            }
        });
    }
}

#[async_trait::async_trait]
impl KeywordService for SeaOrmKeywordService {
    async fn list(&self, rfq_id: i32) -> Result<Vec<String>, ServiceError> {
        self.rfq(rfq_id).await?;
        Ok(self.store.list_keywords(rfq_id).await?)
    }

    async fn add(
        &self,
        rfq_id: i32,
        keywords: &[String],
        actor: &Principal,
    ) -> Result<Vec<String>, ServiceError> {
        self.owned(rfq_id, actor).await?;
        let keywords = prepare_keywords(keywords, self.max_per_request().await)?;

        let inserted = self.store.add_keywords(rfq_id, &keywords).await?;
        if !inserted.is_empty() {
            info!(rfq_id, added = inserted.len(), "Keywords attached");
        }
        self.report_usage(inserted);

        Ok(self.store.list_keywords(rfq_id).await?)
    }

    async fn remove(
        &self,
        rfq_id: i32,
        keywords: &[String],
        actor: &Principal,
    ) -> Result<Vec<String>, ServiceError> {
        self.owned(rfq_id, actor).await?;
        let keywords = prepare_keywords(keywords, self.max_per_request().await)?;

        let removed = self.store.remove_keywords(rfq_id, &keywords).await?;
        if removed > 0 {
            info!(rfq_id, removed, "Keywords detached");
        }

        Ok(self.store.list_keywords(rfq_id).await?)
    }
}
