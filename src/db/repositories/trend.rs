use crate::db::timestamp;
use crate::entities::{keyword_trends, prelude::*, search_queries};
use crate::models::KeywordTrend;
use crate::models::trend::decayed_score;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Repository for the search-query log and keyword trend counters.
pub struct TrendRepository {
    conn: DatabaseConnection,
}

impl TrendRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn log_query(&self, query_text: &str, at: DateTime<Utc>) -> Result<()> {
        search_queries::ActiveModel {
            query_text: Set(query_text.to_string()),
            created_at: Set(timestamp(at)),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(())
    }

    async fn find_in(
        txn: &DatabaseTransaction,
        keyword: &str,
    ) -> Result<Option<keyword_trends::Model>> {
        let row = KeywordTrends::find()
            .filter(keyword_trends::Column::Keyword.eq(keyword))
            .one(txn)
            .await?;
        Ok(row)
    }

    /// Inserts an empty counter row for `keyword` unless one exists.
    async fn ensure_row(txn: &DatabaseTransaction, keyword: &str, stamp: &str) -> Result<()> {
        KeywordTrends::insert(keyword_trends::ActiveModel {
            keyword: Set(keyword.to_string()),
            search_count: Set(0),
            usage_count: Set(0),
            trend_score: Set(0.0),
            last_updated: Set(stamp.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(keyword_trends::Column::Keyword)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
        Ok(())
    }

    /// Counts one search hit for each token and refreshes its decayed score.
    pub async fn record_searches(
        &self,
        tokens: &[String],
        at: DateTime<Utc>,
        half_life_days: i64,
    ) -> Result<()> {
        if tokens.is_empty() {
            return Ok(());
        }

        let txn = self.conn.begin().await?;
        let stamp = timestamp(at);

        // Claim every row up front so the transaction takes the write lock
        // before it reads anything.
        for token in tokens {
            Self::ensure_row(&txn, token, &stamp).await?;
        }

        for token in tokens {
            let row = Self::find_in(&txn, token)
                .await?
                .ok_or_else(|| anyhow::anyhow!("trend row for '{token}' vanished mid-transaction"))?;

            let previous_at = DateTime::parse_from_rfc3339(&row.last_updated)
                .ok()
                .map(|t| t.with_timezone(&Utc));
            let score = decayed_score(row.trend_score, previous_at, at, half_life_days, 1.0);
            let search_count = row.search_count + 1;

            let mut active: keyword_trends::ActiveModel = row.into();
            active.search_count = Set(search_count);
            active.trend_score = Set(score);
            active.last_updated = Set(stamp.clone());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Counts keyword attachments. Leaves the search counters and score alone.
    pub async fn record_usage(&self, keywords: &[String], at: DateTime<Utc>) -> Result<()> {
        if keywords.is_empty() {
            return Ok(());
        }

        let txn = self.conn.begin().await?;
        let stamp = timestamp(at);

        for keyword in keywords {
            KeywordTrends::insert(keyword_trends::ActiveModel {
                keyword: Set(keyword.clone()),
                search_count: Set(0),
                usage_count: Set(1),
                trend_score: Set(0.0),
                last_updated: Set(stamp.clone()),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::column(keyword_trends::Column::Keyword)
                    .value(
                        keyword_trends::Column::UsageCount,
                        Expr::col(keyword_trends::Column::UsageCount).add(1),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn get(&self, keyword: &str) -> Result<Option<KeywordTrend>> {
        let row = KeywordTrends::find()
            .filter(keyword_trends::Column::Keyword.eq(keyword))
            .one(&self.conn)
            .await?;
        Ok(row.map(KeywordTrend::from))
    }

    /// Searched keywords touched since `since`, unordered. Scores are as
    /// stored; callers decay them to a common instant before ranking.
    pub async fn trending(&self, since: DateTime<Utc>) -> Result<Vec<KeywordTrend>> {
        let rows = KeywordTrends::find()
            .filter(keyword_trends::Column::LastUpdated.gte(timestamp(since)))
            .filter(keyword_trends::Column::SearchCount.gt(0))
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(KeywordTrend::from).collect())
    }

    pub async fn most_searched(&self, limit: u64) -> Result<Vec<KeywordTrend>> {
        let rows = KeywordTrends::find()
            .filter(keyword_trends::Column::SearchCount.gt(0))
            .order_by_desc(keyword_trends::Column::SearchCount)
            .order_by_asc(keyword_trends::Column::Keyword)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(KeywordTrend::from).collect())
    }

    pub async fn containing(&self, fragment: &str, limit: u64) -> Result<Vec<KeywordTrend>> {
        let rows = KeywordTrends::find()
            .filter(keyword_trends::Column::Keyword.contains(fragment))
            .order_by_desc(keyword_trends::Column::SearchCount)
            .order_by_asc(keyword_trends::Column::Keyword)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(KeywordTrend::from).collect())
    }

    pub async fn prune_queries(&self, before: DateTime<Utc>) -> Result<u64> {
        let result = SearchQueries::delete_many()
            .filter(search_queries::Column::CreatedAt.lt(timestamp(before)))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn count_queries(&self) -> Result<u64> {
        Ok(SearchQueries::find().count(&self.conn).await?)
    }
}
