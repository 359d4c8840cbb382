use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::article::{ArticleId, ARTICLE_DATE_FORMAT};
use crate::error::{Error, Result};

/// `YYYYMMDD` with the year bounded to 1200-9999
const COMPACT_DATE_PATTERN: &str = r"^(1[2-9]\d{2}|[2-9]\d{3})(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])$";
const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

static COMPACT_DATE_REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

/// Calendar date used to look up tagged articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagDate(NaiveDate);

impl TagDate {
    /// Parses a compact `YYYYMMDD` date.
    ///
    /// The string must first match the bounded pattern and then name a real
    /// calendar day; `20230230` passes the pattern but fails here.
    pub fn parse_compact(value: &str) -> Result<Self> {
        let regex = COMPACT_DATE_REGEX
            .get_or_init(|| Regex::new(COMPACT_DATE_PATTERN))
            .as_ref()
            .map_err(|e| Error::invalid_date(value, format!("date pattern unavailable: {}", e)))?;

        if !regex.is_match(value) {
            return Err(Error::invalid_date(value, "expected YYYYMMDD"));
        }

        NaiveDate::parse_from_str(value, COMPACT_DATE_FORMAT)
            .map(TagDate)
            .map_err(|e| Error::invalid_date(value, e.to_string()))
    }

    /// The date as stored in the `date` column
    pub fn to_article_date(&self) -> String {
        self.0.format(ARTICLE_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for TagDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_article_date())
    }
}

/// Derived report for one tag on one day. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSummary {
    /// The queried tag
    pub tag: String,
    /// Number of articles carrying the tag on that day
    pub count: usize,
    /// Matching article ids in store order
    pub articles: Vec<ArticleId>,
    /// Other tags found on those articles, deduplicated
    pub related_tags: Vec<String>,
}

impl TagSummary {
    pub fn new(tag: &str, articles: Vec<ArticleId>, related_tags: Vec<String>) -> Self {
        Self {
            tag: tag.to_string(),
            count: articles.len(),
            articles,
            related_tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_compact_accepts_real_dates() {
        let date = TagDate::parse_compact("20230220").unwrap();
        assert_eq!(date.to_article_date(), "2023-02-20");

        let leap = TagDate::parse_compact("20240229").unwrap();
        assert_eq!(leap.to_article_date(), "2024-02-29");
    }

    #[test]
    fn test_parse_compact_rejects_pattern_mismatches() {
        for value in [
            "99999999", "20220540", "2023022", "202302201", "2023-02-20", "abcdefgh", "11990101",
            "",
        ] {
            let err = TagDate::parse_compact(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{value}");
            assert!(matches!(err, Error::InvalidDate { .. }), "{value}");
        }
    }

    #[test]
    fn test_parse_compact_rejects_impossible_calendar_days() {
        // Pattern-valid but not a real day
        for value in ["20230230", "20230431", "20230229"] {
            assert!(matches!(
                TagDate::parse_compact(value),
                Err(Error::InvalidDate { .. })
            ));
        }
    }

    #[test]
    fn test_tag_summary_counts_articles() {
        let summary = TagSummary::new(
            "health",
            vec![ArticleId(1), ArticleId(3)],
            vec!["fitness".to_string()],
        );
        assert_eq!(summary.count, 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag": "health",
                "count": 2,
                "articles": [1, 3],
                "related_tags": ["fitness"]
            })
        );
    }
}
