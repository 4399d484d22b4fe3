use crate::db::now;
use crate::entities::{prelude::*, rfq_keywords};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

/// Repository for RFQ keyword associations. Keywords arrive already normalized.
pub struct KeywordRepository {
    conn: DatabaseConnection,
}

impl KeywordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, rfq_id: i32) -> Result<Vec<String>> {
        let keywords: Vec<String> = RfqKeywords::find()
            .select_only()
            .column(rfq_keywords::Column::Keyword)
            .distinct()
            .filter(rfq_keywords::Column::RfqId.eq(rfq_id))
            .order_by_asc(rfq_keywords::Column::Keyword)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(keywords)
    }

    /// Inserts the keywords not yet associated with the RFQ and returns them.
    /// Already present keywords are skipped; the batch commits or rolls back as one.
    pub async fn add(&self, rfq_id: i32, keywords: &[String]) -> Result<Vec<String>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self.conn.begin().await?;
        let created_at = now();
        let mut inserted = Vec::new();

        // Write-only statements: the transaction holds the write lock from
        // its first statement on.
        for keyword in keywords {
            let affected = RfqKeywords::insert(rfq_keywords::ActiveModel {
                rfq_id: Set(rfq_id),
                keyword: Set(keyword.clone()),
                created_at: Set(created_at.clone()),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::columns([rfq_keywords::Column::RfqId, rfq_keywords::Column::Keyword])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

            if affected > 0 {
                inserted.push(keyword.clone());
            }
        }

        txn.commit().await?;
        Ok(inserted)
    }

    pub async fn remove(&self, rfq_id: i32, keywords: &[String]) -> Result<u64> {
        if keywords.is_empty() {
            return Ok(0);
        }

        let txn = self.conn.begin().await?;

        let result = RfqKeywords::delete_many()
            .filter(rfq_keywords::Column::RfqId.eq(rfq_id))
            .filter(rfq_keywords::Column::Keyword.is_in(keywords.iter().cloned()))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected)
    }

    /// Distinct associated keywords containing `fragment` (already stripped of LIKE wildcards).
    pub async fn containing(&self, fragment: &str, limit: u64) -> Result<Vec<String>> {
        let keywords: Vec<String> = RfqKeywords::find()
            .select_only()
            .column(rfq_keywords::Column::Keyword)
            .distinct()
            .filter(rfq_keywords::Column::Keyword.contains(fragment))
            .order_by_asc(rfq_keywords::Column::Keyword)
            .limit(limit)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(keywords)
    }
}
