pub mod bid;
pub mod keyword;
pub mod rfq;
pub mod search;
pub mod trend;
