use serde::{Deserialize, Serialize};

use crate::models::{Page, PageMeta, SearchParams};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            meta: None,
            error: Some(message.into()),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn page(page: Page<T>) -> Self {
        Self {
            success: true,
            data: Some(page.items),
            meta: Some(page.meta),
            error: None,
        }
    }
}

/// Splits a comma separated query value into its non-empty parts.
fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// `GET /rfq/search` query string. `keywords` is comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub keywords: Option<String>,
    pub category_id: Option<i32>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl From<SearchQuery> for SearchParams {
    fn from(q: SearchQuery) -> Self {
        Self {
            keywords: split_csv(q.keywords.as_deref()),
            query: q.q,
            category_id: q.category_id,
            budget_min: q.budget_min,
            budget_max: q.budget_max,
            limit: q.limit,
            offset: q.offset,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KeywordLookupQuery {
    pub keywords: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl KeywordLookupQuery {
    #[must_use]
    pub fn keyword_list(&self) -> Vec<String> {
        split_csv(self.keywords.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub rfq_id: i32,
    pub keywords: Vec<String>,
}
