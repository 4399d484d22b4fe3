use super::sea_orm_active_enums::RfqStatus;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rfqs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub buyer_id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category_id: Option<i32>,

    pub subcategory_id: Option<i32>,

    pub budget_min: Option<f64>,

    pub budget_max: Option<f64>,

    /// ISO 4217 code, upper-cased
    pub currency: String,

    pub status: RfqStatus,

    /// Unicode lower-cased title and description
    #[sea_orm(column_type = "Text", default_value = "")]
    pub search_text: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(has_many = "super::rfq_keywords::Entity")]
    RfqKeywords,
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::rfq_keywords::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RfqKeywords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
