//! `SeaORM` implementation of the `SearchService` trait.
//!
//! Search composes the store with a [`TrendService`] collaborator rather than
//! owning trend bookkeeping itself.

use crate::config::Config;
use crate::db::{SearchCriteria, Store};
use crate::domain::text::{
    normalize_keyword, normalize_keywords, sanitize_for_log, sanitize_text, search_terms,
    strip_like_wildcards,
};
use crate::models::{KeywordSuggestion, Page, PageMeta, Rfq, SearchHit, SearchParams};
use crate::services::ServiceError;
use crate::services::error::bounded;
use crate::services::rfq_service::check_budget;
use crate::services::search_service::{
    SUGGEST_DEFAULT_LIMIT, SUGGEST_MAX_LIMIT, SearchService, rank, relevance,
};
use crate::services::trend_service::{QUERY_LOG_MAX_CHARS, TrendService};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub struct SeaOrmSearchService {
    store: Store,
    trends: Arc<dyn TrendService>,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmSearchService {
    #[must_use]
    pub fn new(store: Store, trends: Arc<dyn TrendService>, config: Arc<RwLock<Config>>) -> Self {
        Self {
            store,
            trends,
            config,
        }
    }

    async fn page_bounds(
        &self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<(u64, u64), ServiceError> {
        let config = self.config.read().await;
        let limit = bounded(
            "limit",
            limit,
            config.search.default_limit,
            1,
            config.search.max_limit,
        )?;

        let offset = offset.unwrap_or(0);
        if offset > config.search.max_offset {
            return Err(ServiceError::validation(format!(
                "offset cannot exceed {}; narrow the filters instead",
                config.search.max_offset
            )));
        }

        Ok((limit, offset))
    }

    fn track_in_background(&self, query: String) {
        let trends = Arc::clone(&self.trends);
        tokio::spawn(async move {
            if let Err(e) = trends.track(&query).await {
                metrics::counter!("trend_tracking_failures_total").increment(1);
                warn!(
                    error = %e,
                    query = %sanitize_for_log(&query),
                    "Failed to track search query"
                );
            }
        });
    }
}

#[async_trait::async_trait]
impl SearchService for SeaOrmSearchService {
    async fn search(&self, params: SearchParams) -> Result<Page<SearchHit>, ServiceError> {
        let (limit, offset) = self.page_bounds(params.limit, params.offset).await?;

        check_budget("budget_min", params.budget_min)?;
        check_budget("budget_max", params.budget_max)?;

        let criteria = SearchCriteria {
            terms: params
                .query
                .as_deref()
                .map(search_terms)
                .unwrap_or_default(),
            keywords: normalize_keywords(&params.keywords),
            category_id: params.category_id,
            budget_min: params.budget_min,
            budget_max: params.budget_max,
        };

        let cap = self.config.read().await.search.max_candidates;
        let candidates = self.store.search_candidates(&criteria, cap).await?;

        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .map(|rfq| {
                let score = relevance(&rfq, &criteria.terms);
                SearchHit { rfq, score }
            })
            .collect();
        rank(&mut hits);

        let total = hits.len() as u64;
        let items: Vec<SearchHit> = hits
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        metrics::counter!("search_requests_total").increment(1);
        debug!(
            terms = criteria.terms.len(),
            keywords = criteria.keywords.len(),
            total,
            "Search executed"
        );

        if let Some(query) = params.query {
            let query = sanitize_text(&query, QUERY_LOG_MAX_CHARS, false);
            if !query.is_empty() {
                self.track_in_background(query);
            }
        }

        Ok(Page {
            items,
            meta: PageMeta::new(total, limit, offset),
        })
    }

    async fn suggest(
        &self,
        partial: &str,
        limit: Option<u64>,
    ) -> Result<Vec<KeywordSuggestion>, ServiceError> {
        let limit = bounded("limit", limit, SUGGEST_DEFAULT_LIMIT, 1, SUGGEST_MAX_LIMIT)?;
        let min_chars = self.config.read().await.search.suggestion_min_chars;

        let Some(fragment) = normalize_keyword(partial).map(|f| strip_like_wildcards(&f)) else {
            return Ok(Vec::new());
        };
        if fragment.chars().count() < min_chars {
            return Ok(Vec::new());
        }

        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for trend in self.store.trends_containing(&fragment, limit).await? {
            counts.insert(trend.keyword, trend.search_count);
        }
        for keyword in self.store.keywords_containing(&fragment, limit).await? {
            counts.entry(keyword).or_insert(0);
        }

        let mut suggestions: Vec<KeywordSuggestion> = counts
            .into_iter()
            .map(|(keyword, search_count)| KeywordSuggestion {
                keyword,
                search_count,
            })
            .collect();
        suggestions.sort_by(|a, b| {
            b.search_count
                .cmp(&a.search_count)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        suggestions.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(suggestions)
    }

    async fn find_by_keywords(
        &self,
        keywords: &[String],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Page<Rfq>, ServiceError> {
        let (limit, offset) = self.page_bounds(limit, offset).await?;

        let keywords = normalize_keywords(keywords);
        if keywords.is_empty() {
            return Err(ServiceError::validation("at least one keyword is required"));
        }

        let (items, total) = self
            .store
            .find_rfqs_by_keywords(&keywords, limit, offset)
            .await?;

        Ok(Page {
            items,
            meta: PageMeta::new(total, limit, offset),
        })
    }
}
