use crate::entities::keyword_trends;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordTrend {
    pub keyword: String,
    pub search_count: i64,
    pub usage_count: i64,
    pub trend_score: f64,
    pub last_updated: String,
}

impl From<keyword_trends::Model> for KeywordTrend {
    fn from(m: keyword_trends::Model) -> Self {
        Self {
            keyword: m.keyword,
            search_count: m.search_count,
            usage_count: m.usage_count,
            trend_score: m.trend_score,
            last_updated: m.last_updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSuggestion {
    pub keyword: String,
    pub search_count: i64,
}

/// Decays `previous` by the time elapsed since `previous_at` (half-life of
/// `half_life_days`) and adds `hits`. Recent and frequent searches therefore
/// outrank old ones with the same raw count.
#[must_use]
pub fn decayed_score(
    previous: f64,
    previous_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    half_life_days: i64,
    hits: f64,
) -> f64 {
    let Some(previous_at) = previous_at else {
        return hits;
    };

    let elapsed_secs = (now - previous_at).num_seconds().max(0) as f64;
    let half_life_secs = (half_life_days.max(1) * 86_400) as f64;
    let decay = 0.5_f64.powf(elapsed_secs / half_life_secs);

    previous.mul_add(decay, hits)
}

/// Brings every score to `now` before comparing: a stored score has only been
/// decayed up to its own `last_updated`. Orders by current score, then
/// search count, then keyword, and keeps the first `limit` rows.
#[must_use]
pub fn rank_trending(
    rows: Vec<KeywordTrend>,
    now: DateTime<Utc>,
    half_life_days: i64,
    limit: usize,
) -> Vec<KeywordTrend> {
    let mut ranked: Vec<KeywordTrend> = rows
        .into_iter()
        .map(|mut row| {
            let updated_at = DateTime::parse_from_rfc3339(&row.last_updated)
                .ok()
                .map(|t| t.with_timezone(&Utc));
            if updated_at.is_some() {
                row.trend_score =
                    decayed_score(row.trend_score, updated_at, now, half_life_days, 0.0);
            }
            row
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.trend_score
            .partial_cmp(&a.trend_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.search_count.cmp(&a.search_count))
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_first_hit_scores_one() {
        let now = Utc::now();
        assert!((decayed_score(0.0, None, now, 7, 1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repeated_hits_accumulate() {
        let now = Utc::now();
        let mut score = decayed_score(0.0, None, now, 7, 1.0);
        score = decayed_score(score, Some(now), now, 7, 1.0);
        score = decayed_score(score, Some(now), now, 7, 1.0);
        assert!((score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_halves_after_half_life() {
        let now = Utc::now();
        let week_ago = now - Duration::days(7);
        let score = decayed_score(4.0, Some(week_ago), now, 7, 0.0);
        assert!((score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_hit_beats_stale_count() {
        let now = Utc::now();
        let stale = decayed_score(5.0, Some(now - Duration::days(30)), now, 7, 1.0);
        let fresh = decayed_score(2.0, Some(now), now, 7, 1.0);
        assert!(fresh > stale);
    }

    fn trend(keyword: &str, search_count: i64, trend_score: f64, at: DateTime<Utc>) -> KeywordTrend {
        KeywordTrend {
            keyword: keyword.to_string(),
            search_count,
            usage_count: 0,
            trend_score,
            last_updated: crate::db::timestamp(at),
        }
    }

    #[test]
    fn test_rank_trending_decays_to_now() {
        let now = Utc::now();
        let rows = vec![
            trend("alpha", 4, 4.0, now - Duration::days(6)),
            trend("beta", 3, 3.0, now),
        ];

        let ranked = rank_trending(rows, now, 7, 10);
        let keywords: Vec<&str> = ranked.iter().map(|t| t.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["beta", "alpha"]);
        assert!((ranked[1].trend_score - 4.0 * 0.5_f64.powf(6.0 / 7.0)).abs() < 1e-6);
    }

    #[test]
    fn test_rank_trending_ties_and_limit() {
        let now = Utc::now();
        let rows = vec![
            trend("gamma", 1, 2.0, now),
            trend("beta", 2, 2.0, now),
            trend("alpha", 2, 2.0, now),
        ];

        let ranked = rank_trending(rows, now, 7, 2);
        let keywords: Vec<&str> = ranked.iter().map(|t| t.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["alpha", "beta"]);
    }
}
