use super::sea_orm_active_enums::BidStatus;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub rfq_id: i32,

    pub vendor_id: i32,

    pub amount: f64,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Delivery time in days
    pub delivery_time: Option<i32>,

    pub status: BidStatus,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rfqs::Entity",
        from = "Column::RfqId",
        to = "super::rfqs::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Rfq,
}

impl Related<super::rfqs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rfq.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
