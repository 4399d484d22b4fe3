//! Normalization of user supplied text before it is persisted or logged.

/// Maximum length of a normalized keyword, in characters.
pub const MAX_KEYWORD_CHARS: usize = 50;

/// Maximum length of a logged user string, in characters.
pub const MAX_LOG_CHARS: usize = 120;

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Trims, lower-cases and truncates a keyword. Returns `None` when nothing is left.
///
/// ```rust
/// use rfqhub::domain::text::normalize_keyword;
///
/// assert_eq!(normalize_keyword("  Design "), Some("design".to_string()));
/// assert_eq!(normalize_keyword("   "), None);
/// ```
#[must_use]
pub fn normalize_keyword(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_lowercase();

    let truncated = truncate_chars(&cleaned, MAX_KEYWORD_CHARS).trim_end();
    if truncated.is_empty() {
        None
    } else {
        Some(truncated.to_string())
    }
}

/// Normalizes a batch of keywords, dropping empties and duplicates while
/// keeping first-seen order.
#[must_use]
pub fn normalize_keywords<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .filter_map(|k| normalize_keyword(k.as_ref()))
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

/// Strips control characters (newlines and tabs survive when `multiline`),
/// trims and truncates free text.
#[must_use]
pub fn sanitize_text(raw: &str, max_chars: usize, multiline: bool) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || (multiline && matches!(c, '\n' | '\t')))
        .collect();
    truncate_chars(cleaned.trim(), max_chars).trim_end().to_string()
}

/// Makes a user string safe to interpolate into a log line.
#[must_use]
pub fn sanitize_for_log(raw: &str) -> String {
    let flattened: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let truncated = truncate_chars(&flattened, MAX_LOG_CHARS);
    if truncated.len() < flattened.len() {
        format!("{truncated}...")
    } else {
        truncated.to_string()
    }
}

/// Lower-cased alphanumeric runs, used for relevance scoring and SQL matching.
#[must_use]
pub fn search_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Whitespace tokens of a search query that qualify for trend tracking:
/// normalized like keywords and longer than two characters.
#[must_use]
pub fn trend_tokens(query: &str) -> Vec<String> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    normalize_keywords(&tokens)
        .into_iter()
        .filter(|t| t.chars().count() > 2)
        .collect()
}

/// Lower-cased title and description, stored with the RFQ for term matching.
/// SQLite `LIKE` and `lower()` only fold ASCII.
#[must_use]
pub fn search_document(title: &str, description: &str) -> String {
    format!("{}\n{}", title.to_lowercase(), description.to_lowercase())
}

/// Removes LIKE wildcards so user input can be embedded in a pattern.
#[must_use]
pub fn strip_like_wildcards(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '%' | '_' | '\\'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_document_folds_non_ascii() {
        let doc = search_document("Élan Branding", "ÜBER fast délivery");
        assert_eq!(doc, "élan branding\nüber fast délivery");
        for term in search_terms("ÉLAN über") {
            assert!(doc.contains(&term), "{term} should match");
        }
    }

    #[test]
    fn test_normalize_keyword() {
        assert_eq!(normalize_keyword("Design"), Some("design".to_string()));
        assert_eq!(normalize_keyword("design "), Some("design".to_string()));
        assert_eq!(normalize_keyword("\tWeb\u{0007}Dev\n"), Some("webdev".to_string()));
        assert_eq!(normalize_keyword(""), None);

        let long = "x".repeat(80);
        assert_eq!(normalize_keyword(&long).unwrap().len(), MAX_KEYWORD_CHARS);
    }

    #[test]
    fn test_normalize_keywords_dedupes() {
        let normalized = normalize_keywords(&["Design", "design ", " ", "Logo"]);
        assert_eq!(normalized, vec!["design", "logo"]);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let raw = "é".repeat(60);
        let normalized = normalize_keyword(&raw).unwrap();
        assert_eq!(normalized.chars().count(), MAX_KEYWORD_CHARS);
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  hello\r\nworld ", 100, false), "helloworld");
        assert_eq!(sanitize_text("line one\nline two", 100, true), "line one\nline two");
        assert_eq!(sanitize_text("abcdef", 3, false), "abc");
    }

    #[test]
    fn test_sanitize_for_log() {
        assert_eq!(sanitize_for_log("web\ndesign"), "web design");
        let long = "a".repeat(200);
        let logged = sanitize_for_log(&long);
        assert!(logged.ends_with("..."));
        assert_eq!(logged.len(), MAX_LOG_CHARS + 3);
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms("Web-Design, web LOGO!"), vec!["web", "design", "logo"]);
        assert!(search_terms("  ...  ").is_empty());
    }

    #[test]
    fn test_trend_tokens() {
        assert_eq!(trend_tokens("web design"), vec!["web", "design"]);
        assert_eq!(trend_tokens("a an the logo"), vec!["the", "logo"]);
        assert_eq!(trend_tokens("Logo logo"), vec!["logo"]);
    }

    #[test]
    fn test_strip_like_wildcards() {
        assert_eq!(strip_like_wildcards("50%_off\\"), "50off");
    }
}
