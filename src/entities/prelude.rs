pub use super::bids::Entity as Bids;
pub use super::keyword_trends::Entity as KeywordTrends;
pub use super::rfq_keywords::Entity as RfqKeywords;
pub use super::rfqs::Entity as Rfqs;
pub use super::search_queries::Entity as SearchQueries;
