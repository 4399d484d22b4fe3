use crate::entities::{prelude::*, rfq_keywords, rfqs};
use crate::models::{Rfq, RfqStatus};
use anyhow::Result;
use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Structured part of a search, already normalized by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Every term must occur in the title or the description.
    pub terms: Vec<String>,
    /// RFQ must carry at least one of these keywords.
    pub keywords: Vec<String>,
    pub category_id: Option<i32>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}

pub struct SearchRepository {
    conn: DatabaseConnection,
}

fn rfq_ids_with_keywords(keywords: &[String]) -> SelectStatement {
    Query::select()
        .column(rfq_keywords::Column::RfqId)
        .from(RfqKeywords)
        .and_where(rfq_keywords::Column::Keyword.is_in(keywords.iter().cloned()))
        .to_owned()
}

impl SearchRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Open RFQs matching every filter, newest first, capped at `cap` rows.
    /// Ranking happens in the service.
    pub async fn candidates(&self, criteria: &SearchCriteria, cap: u64) -> Result<Vec<Rfq>> {
        let mut select = Rfqs::find().filter(rfqs::Column::Status.eq(RfqStatus::Open));

        // Terms arrive lower-cased; `search_text` is the lower-cased title and description.
        for term in &criteria.terms {
            select = select.filter(rfqs::Column::SearchText.contains(term.as_str()));
        }

        if !criteria.keywords.is_empty() {
            select = select
                .filter(rfqs::Column::Id.in_subquery(rfq_ids_with_keywords(&criteria.keywords)));
        }

        if let Some(category_id) = criteria.category_id {
            select = select.filter(rfqs::Column::CategoryId.eq(category_id));
        }
        if let Some(min) = criteria.budget_min {
            select = select.filter(rfqs::Column::BudgetMin.gte(min));
        }
        if let Some(max) = criteria.budget_max {
            select = select.filter(rfqs::Column::BudgetMax.lte(max));
        }

        let rows = select
            .order_by_desc(rfqs::Column::CreatedAt)
            .order_by_desc(rfqs::Column::Id)
            .limit(cap)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Rfq::from).collect())
    }

    /// RFQs associated with any of `keywords`, newest first.
    pub async fn by_keywords(
        &self,
        keywords: &[String],
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Rfq>, u64)> {
        let select = Rfqs::find().filter(rfqs::Column::Id.in_subquery(rfq_ids_with_keywords(keywords)));

        let total = select.clone().count(&self.conn).await?;

        let rows = select
            .order_by_desc(rfqs::Column::CreatedAt)
            .order_by_desc(rfqs::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.conn)
            .await?;

        Ok((rows.into_iter().map(Rfq::from).collect(), total))
    }
}
