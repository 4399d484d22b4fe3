pub mod bid;
pub mod rfq;
pub mod search;
pub mod trend;

pub use crate::entities::sea_orm_active_enums::{BidStatus, RfqStatus};
pub use bid::{Bid, BidUpdate, BidView, NewBid};
pub use rfq::{NewRfq, Rfq, RfqFilter, RfqUpdate};
pub use search::{Page, PageMeta, SearchHit, SearchParams};
pub use trend::{KeywordSuggestion, KeywordTrend};
