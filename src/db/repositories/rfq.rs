use crate::db::now;
use crate::domain::text::search_document;
use crate::entities::{prelude::*, rfqs};
use crate::models::{Rfq, RfqFilter, RfqStatus};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Validated, normalized RFQ fields ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct RfqFields {
    pub title: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub currency: String,
}

pub struct RfqRepository {
    conn: DatabaseConnection,
}

impl RfqRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, buyer_id: i32, fields: &RfqFields) -> Result<Rfq> {
        let timestamp = now();
        let model = rfqs::ActiveModel {
            buyer_id: Set(buyer_id),
            title: Set(fields.title.clone()),
            description: Set(fields.description.clone()),
            category_id: Set(fields.category_id),
            subcategory_id: Set(fields.subcategory_id),
            budget_min: Set(fields.budget_min),
            budget_max: Set(fields.budget_max),
            currency: Set(fields.currency.clone()),
            status: Set(RfqStatus::Open),
            search_text: Set(search_document(&fields.title, &fields.description)),
            created_at: Set(timestamp.clone()),
            updated_at: Set(timestamp),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(Rfq::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Rfq>> {
        let row = Rfqs::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Rfq::from))
    }

    pub async fn list(&self, filter: &RfqFilter, limit: u64, offset: u64) -> Result<(Vec<Rfq>, u64)> {
        let mut select = Rfqs::find();

        if let Some(category_id) = filter.category_id {
            select = select.filter(rfqs::Column::CategoryId.eq(category_id));
        }
        if let Some(buyer_id) = filter.buyer_id {
            select = select.filter(rfqs::Column::BuyerId.eq(buyer_id));
        }
        if let Some(status) = filter.status {
            select = select.filter(rfqs::Column::Status.eq(status));
        }

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

    pub async fn update(&self, id: i32, fields: &RfqFields) -> Result<Rfq> {
        let model = rfqs::ActiveModel {
            id: Set(id),
            title: Set(fields.title.clone()),
            description: Set(fields.description.clone()),
            category_id: Set(fields.category_id),
            subcategory_id: Set(fields.subcategory_id),
            budget_min: Set(fields.budget_min),
            budget_max: Set(fields.budget_max),
            currency: Set(fields.currency.clone()),
            search_text: Set(search_document(&fields.title, &fields.description)),
            updated_at: Set(now()),
            ..Default::default()
        }
        .update(&self.conn)
        .await?;

        Ok(Rfq::from(model))
    }

    /// Writes the status unconditionally; setting the current status again is harmless.
    pub async fn set_status(&self, id: i32, status: RfqStatus) -> Result<Option<Rfq>> {
        Rfqs::update_many()
            .col_expr(
                rfqs::Column::Status,
                sea_orm::sea_query::Expr::value(status),
            )
            .col_expr(
                rfqs::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now()),
            )
            .filter(rfqs::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        self.get(id).await
    }

    pub async fn find_related(&self, rfq: &Rfq, limit: u64) -> Result<Vec<Rfq>> {
        let Some(category_id) = rfq.category_id else {
            return Ok(Vec::new());
        };

        let rows = Rfqs::find()
            .filter(rfqs::Column::CategoryId.eq(category_id))
            .filter(rfqs::Column::Status.eq(RfqStatus::Open))
            .filter(rfqs::Column::Id.ne(rfq.id))
            .order_by_desc(rfqs::Column::CreatedAt)
            .order_by_desc(rfqs::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Rfq::from).collect())
    }
}
