pub mod error;
pub use error::ServiceError;

pub mod rfq_service;
pub mod rfq_service_impl;
pub use rfq_service::RfqService;
pub use rfq_service_impl::SeaOrmRfqService;

pub mod bid_service;
pub mod bid_service_impl;
pub use bid_service::{Award, BidService};
pub use bid_service_impl::SeaOrmBidService;

pub mod keyword_service;
pub mod keyword_service_impl;
pub use keyword_service::KeywordService;
pub use keyword_service_impl::SeaOrmKeywordService;

pub mod trend_service;
pub mod trend_service_impl;
pub use trend_service::TrendService;
pub use trend_service_impl::SeaOrmTrendService;

pub mod search_service;
pub mod search_service_impl;
pub use search_service::SearchService;
pub use search_service_impl::SeaOrmSearchService;
