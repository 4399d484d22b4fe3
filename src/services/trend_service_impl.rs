//! `SeaORM` implementation of the `TrendService` trait.

use crate::config::Config;
use crate::db::Store;
use crate::domain::text::{sanitize_for_log, sanitize_text, trend_tokens};
use crate::models::KeywordTrend;
use crate::models::trend::rank_trending;
use crate::services::ServiceError;
use crate::services::error::bounded;
use crate::services::trend_service::{
    MOST_SEARCHED_DEFAULT_LIMIT, QUERY_LOG_MAX_CHARS, QUERY_MIN_CHARS, TREND_MAX_LIMIT,
    TRENDING_DEFAULT_LIMIT, TrendService,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub struct SeaOrmTrendService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmTrendService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    async fn window_days(&self) -> i64 {
        self.config.read().await.trends.recency_window_days
    }
}

#[async_trait::async_trait]
impl TrendService for SeaOrmTrendService {
    async fn track(&self, query_text: &str) -> Result<(), ServiceError> {
        let query = sanitize_text(query_text, QUERY_LOG_MAX_CHARS, false);
        if query.chars().count() < QUERY_MIN_CHARS {
            return Ok(());
        }

        let now = Utc::now();
        self.store.log_search_query(&query, now).await?;

        let tokens = trend_tokens(&query);
        if tokens.is_empty() {
            return Ok(());
        }

        let half_life = self.window_days().await;
        self.store
            .record_keyword_searches(&tokens, now, half_life)
            .await?;

        debug!(
            query = %sanitize_for_log(&query),
            tokens = tokens.len(),
            "Search query tracked"
        );
        Ok(())
    }

    async fn record_usage(&self, keywords: &[String]) -> Result<(), ServiceError> {
        self.store.record_keyword_usage(keywords, Utc::now()).await?;
        Ok(())
    }

    async fn trending(&self, limit: Option<u64>) -> Result<Vec<KeywordTrend>, ServiceError> {
        let limit = bounded("limit", limit, TRENDING_DEFAULT_LIMIT, 1, TREND_MAX_LIMIT)?;
        let window = self.window_days().await;
        let now = Utc::now();

        let rows = self
            .store
            .trending_keywords(now - Duration::days(window))
            .await?;

        Ok(rank_trending(
            rows,
            now,
            window,
            usize::try_from(limit).unwrap_or(usize::MAX),
        ))
    }

    async fn most_searched(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<KeywordTrend>, ServiceError> {
        let limit = bounded("limit", limit, MOST_SEARCHED_DEFAULT_LIMIT, 1, TREND_MAX_LIMIT)?;
        Ok(self.store.most_searched_keywords(limit).await?)
    }

    async fn prune_queries(&self, older_than_days: i64) -> Result<u64, ServiceError> {
        if older_than_days < 0 {
            return Err(ServiceError::validation("days must not be negative"));
        }

        let before = Utc::now() - Duration::days(older_than_days);
        let removed = self.store.prune_search_queries(before).await?;

        info!(removed, older_than_days, "Pruned search query log");
        Ok(removed)
    }
}
