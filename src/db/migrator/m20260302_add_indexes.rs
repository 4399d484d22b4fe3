use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_rfqs_created_at ON rfqs(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_rfqs_category_status ON rfqs(category_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_rfqs_buyer ON rfqs(buyer_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_rfq_keywords_unique ON rfq_keywords(rfq_id, keyword)",
    "CREATE INDEX IF NOT EXISTS idx_rfq_keywords_keyword ON rfq_keywords(keyword)",
    "CREATE INDEX IF NOT EXISTS idx_bids_rfq ON bids(rfq_id, status)",
    // At most one live bid per vendor and RFQ; retracted rows stay as history.
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_bids_active_vendor ON bids(rfq_id, vendor_id) WHERE status <> 'retracted'",
    "CREATE INDEX IF NOT EXISTS idx_keyword_trends_recent ON keyword_trends(last_updated, trend_score)",
    "CREATE INDEX IF NOT EXISTS idx_search_queries_created_at ON search_queries(created_at)",
];

const INDEX_NAMES: &[&str] = &[
    "idx_rfqs_created_at",
    "idx_rfqs_category_status",
    "idx_rfqs_buyer",
    "idx_rfq_keywords_unique",
    "idx_rfq_keywords_keyword",
    "idx_bids_rfq",
    "idx_bids_active_vendor",
    "idx_keyword_trends_recent",
    "idx_search_queries_created_at",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for statement in INDEXES {
            conn.execute_unprepared(statement).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for name in INDEX_NAMES {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }

        Ok(())
    }
}
