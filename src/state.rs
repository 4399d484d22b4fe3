use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    BidService, KeywordService, RfqService, SeaOrmBidService, SeaOrmKeywordService,
    SeaOrmRfqService, SeaOrmSearchService, SeaOrmTrendService, SearchService, TrendService,
};

/// Process-wide handles: the config, the store and one instance of every
/// marketplace service, all built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub rfq_service: Arc<dyn RfqService>,

    pub bid_service: Arc<dyn BidService>,

    pub keyword_service: Arc<dyn KeywordService>,

    pub trend_service: Arc<dyn TrendService>,

    pub search_service: Arc<dyn SearchService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires services around an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let config = Arc::new(RwLock::new(config));

        let trend_service = Arc::new(SeaOrmTrendService::new(store.clone(), config.clone()))
            as Arc<dyn TrendService>;

        let rfq_service =
            Arc::new(SeaOrmRfqService::new(store.clone(), config.clone())) as Arc<dyn RfqService>;

        let bid_service =
            Arc::new(SeaOrmBidService::new(store.clone(), config.clone())) as Arc<dyn BidService>;

        let keyword_service = Arc::new(SeaOrmKeywordService::new(
            store.clone(),
            trend_service.clone(),
            config.clone(),
        )) as Arc<dyn KeywordService>;

        let search_service = Arc::new(SeaOrmSearchService::new(
            store.clone(),
            trend_service.clone(),
            config.clone(),
        )) as Arc<dyn SearchService>;

        Self {
            config,
            store,
            rfq_service,
            bid_service,
            keyword_service,
            trend_service,
            search_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
