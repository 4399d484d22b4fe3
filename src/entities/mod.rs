pub mod prelude;

pub mod bids;
pub mod keyword_trends;
pub mod rfq_keywords;
pub mod rfqs;
pub mod sea_orm_active_enums;
pub mod search_queries;
