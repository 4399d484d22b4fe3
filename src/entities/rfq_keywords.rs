use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rfq_keywords")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub rfq_id: i32,

    /// Normalized: trimmed, lower-cased, at most 50 chars
    pub keyword: String,

    pub created_at: String,
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
