use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use validator::Validate;

/// Format of the `date` column and of article payload dates.
pub const ARTICLE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier assigned by the store's sequence on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(ArticleId)
    }
}

/// A persisted article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier assigned once at creation
    pub id: ArticleId,
    pub title: String,
    pub body: String,
    /// Calendar date in `YYYY-MM-DD`
    pub date: String,
    /// Tags in the order the caller supplied them
    pub tags: Vec<String>,
}

impl Article {
    /// Builds the stored representation of a payload once the store has assigned its id
    pub fn from_new(id: ArticleId, article: NewArticle) -> Self {
        Self {
            id,
            title: article.title,
            body: article.body,
            date: article.date,
            tags: article.tags,
        }
    }

    /// Returns true if the article carries the tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Inbound article payload. Any `id` sent by a client is ignored.
///
/// Every field defaults when absent or `null` so that a missing field surfaces
/// as a validation message rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewArticle {
    #[validate(length(min = 1, message = "title is required"))]
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    #[validate(length(min = 1, message = "body is required"))]
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,

    #[validate(
        length(min = 1, message = "date is required"),
        custom(function = "crate::validation::validate_article_date")
    )]
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,

    #[validate(
        length(min = 1, message = "at least one tag is required"),
        custom(function = "crate::validation::validate_tag_entries")
    )]
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// Reads `null` as the field's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl NewArticle {
    pub fn new(title: &str, body: &str, date: &str, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            date: date.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}
