use crate::models::{Bid, KeywordTrend, Rfq, RfqFilter, RfqStatus};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::bid::{AwardOutcome, BidFields};
pub use repositories::rfq::RfqFields;
pub use repositories::search::SearchCriteria;

/// Formats a timestamp with fixed precision so that lexical order equals
/// chronological order in the database.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[must_use]
pub fn now() -> String {
    timestamp(Utc::now())
}

/// Handle to the relational store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn rfq_repo(&self) -> repositories::rfq::RfqRepository {
        repositories::rfq::RfqRepository::new(self.conn.clone())
    }

    fn bid_repo(&self) -> repositories::bid::BidRepository {
        repositories::bid::BidRepository::new(self.conn.clone())
    }

    fn keyword_repo(&self) -> repositories::keyword::KeywordRepository {
        repositories::keyword::KeywordRepository::new(self.conn.clone())
    }

    fn trend_repo(&self) -> repositories::trend::TrendRepository {
        repositories::trend::TrendRepository::new(self.conn.clone())
    }

    fn search_repo(&self) -> repositories::search::SearchRepository {
        repositories::search::SearchRepository::new(self.conn.clone())
    }

    // RFQs

    pub async fn insert_rfq(&self, buyer_id: i32, fields: &RfqFields) -> Result<Rfq> {
        self.rfq_repo().insert(buyer_id, fields).await
    }

    pub async fn get_rfq(&self, id: i32) -> Result<Option<Rfq>> {
        self.rfq_repo().get(id).await
    }

    pub async fn list_rfqs(&self, filter: &RfqFilter, limit: u64, offset: u64) -> Result<(Vec<Rfq>, u64)> {
        self.rfq_repo().list(filter, limit, offset).await
    }

    pub async fn update_rfq(&self, id: i32, fields: &RfqFields) -> Result<Rfq> {
        self.rfq_repo().update(id, fields).await
    }

    pub async fn set_rfq_status(&self, id: i32, status: RfqStatus) -> Result<Option<Rfq>> {
        self.rfq_repo().set_status(id, status).await
    }

    pub async fn find_related_rfqs(&self, rfq: &Rfq, limit: u64) -> Result<Vec<Rfq>> {
        self.rfq_repo().find_related(rfq, limit).await
    }

    // Bids

    pub async fn insert_bid(
        &self,
        rfq_id: i32,
        vendor_id: i32,
        fields: &BidFields,
    ) -> Result<Bid, DbErr> {
        self.bid_repo().insert(rfq_id, vendor_id, fields).await
    }

    pub async fn get_bid(&self, id: i32) -> Result<Option<Bid>> {
        self.bid_repo().get(id).await
    }

    pub async fn find_active_bid(&self, rfq_id: i32, vendor_id: i32) -> Result<Option<Bid>> {
        self.bid_repo().find_active(rfq_id, vendor_id).await
    }

    pub async fn list_bids_for_rfq(&self, rfq_id: i32) -> Result<Vec<Bid>> {
        self.bid_repo().list_for_rfq(rfq_id).await
    }

    pub async fn update_submitted_bid(&self, id: i32, fields: &BidFields) -> Result<Option<Bid>> {
        self.bid_repo().update_submitted(id, fields).await
    }

    pub async fn retract_bid(&self, id: i32) -> Result<Option<Bid>> {
        self.bid_repo().retract(id).await
    }

    pub async fn award_bid(&self, bid_id: i32, rfq_id: i32) -> Result<AwardOutcome> {
        self.bid_repo().award(bid_id, rfq_id).await
    }

    // Keywords

    pub async fn list_keywords(&self, rfq_id: i32) -> Result<Vec<String>> {
        self.keyword_repo().list(rfq_id).await
    }

    pub async fn add_keywords(&self, rfq_id: i32, keywords: &[String]) -> Result<Vec<String>> {
        self.keyword_repo().add(rfq_id, keywords).await
    }

    pub async fn remove_keywords(&self, rfq_id: i32, keywords: &[String]) -> Result<u64> {
        self.keyword_repo().remove(rfq_id, keywords).await
    }

    pub async fn keywords_containing(&self, fragment: &str, limit: u64) -> Result<Vec<String>> {
        self.keyword_repo().containing(fragment, limit).await
    }

    // Trends

    pub async fn log_search_query(&self, query_text: &str, at: DateTime<Utc>) -> Result<()> {
        self.trend_repo().log_query(query_text, at).await
    }

    pub async fn record_keyword_searches(
        &self,
        tokens: &[String],
        at: DateTime<Utc>,
        half_life_days: i64,
    ) -> Result<()> {
        self.trend_repo()
            .record_searches(tokens, at, half_life_days)
            .await
    }

    pub async fn record_keyword_usage(&self, keywords: &[String], at: DateTime<Utc>) -> Result<()> {
        self.trend_repo().record_usage(keywords, at).await
    }

    pub async fn trending_keywords(&self, since: DateTime<Utc>) -> Result<Vec<KeywordTrend>> {
        self.trend_repo().trending(since).await
    }

    pub async fn most_searched_keywords(&self, limit: u64) -> Result<Vec<KeywordTrend>> {
        self.trend_repo().most_searched(limit).await
    }

    pub async fn trends_containing(&self, fragment: &str, limit: u64) -> Result<Vec<KeywordTrend>> {
        self.trend_repo().containing(fragment, limit).await
    }

    pub async fn get_keyword_trend(&self, keyword: &str) -> Result<Option<KeywordTrend>> {
        self.trend_repo().get(keyword).await
    }

    pub async fn prune_search_queries(&self, before: DateTime<Utc>) -> Result<u64> {
        self.trend_repo().prune_queries(before).await
    }

    pub async fn count_search_queries(&self) -> Result<u64> {
        self.trend_repo().count_queries().await
    }

    // Search

    pub async fn search_candidates(&self, criteria: &SearchCriteria, cap: u64) -> Result<Vec<Rfq>> {
        self.search_repo().candidates(criteria, cap).await
    }

    pub async fn find_rfqs_by_keywords(
        &self,
        keywords: &[String],
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Rfq>, u64)> {
        self.search_repo()
            .by_keywords(keywords, limit, offset)
            .await
    }
}
