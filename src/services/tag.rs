use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

use crate::base::repository_traits::ArticleRepository;
use crate::error::{Error, Result};
use crate::models::article::ArticleId;
use crate::models::tag::{TagDate, TagSummary};

/// Folds the tag sets of several articles into the tags co-occurring with
/// `anchor`: first-seen order, exact-string dedup, `anchor` itself dropped.
pub fn collect_related_tags<I>(anchor: &str, tag_sets: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut related = Vec::new();
    for tag in tag_sets.into_iter().flatten() {
        if tag != anchor && seen.insert(tag.clone()) {
            related.push(tag);
        }
    }
    related
}

/// Tag aggregation over the article store
#[derive(Clone)]
pub struct TagService {
    repository: Arc<dyn ArticleRepository>,
}

impl TagService {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self { repository }
    }

    /// Ids of the articles tagged `tag` on the compact `YYYYMMDD` date.
    ///
    /// Bad input is rejected before the store is touched. Zero matches is an
    /// empty vector, not an error.
    pub async fn articles_for_tag_and_date(&self, tag: &str, date: &str) -> Result<Vec<ArticleId>> {
        check_tag(tag)?;
        let date = TagDate::parse_compact(date)?;
        self.repository.get_articles_for_tag_and_date(tag, date).await
    }

    /// Deduplicated tags co-occurring with `tag` on the given articles
    pub async fn related_tags_for_tag(&self, tag: &str, article_ids: &[ArticleId]) -> Result<Vec<String>> {
        check_tag(tag)?;
        self.repository.get_related_tags_for_tag(tag, article_ids).await
    }

    /// Runs both lookups in sequence and builds the summary.
    ///
    /// The second lookup is skipped when no article matches. An empty result
    /// at either step is reported as `Error::NotFound`.
    pub async fn tag_summary(&self, tag: &str, date: &str) -> Result<TagSummary> {
        let articles = self.articles_for_tag_and_date(tag, date).await?;
        if articles.is_empty() {
            info!("No articles tagged '{}' on {}", tag, date);
            return Err(Error::not_found("Articles with given tag not found"));
        }
        debug!("Articles tagged '{}' on {}: {:?}", tag, date, articles);

        let related_tags = self.related_tags_for_tag(tag, &articles).await?;
        if related_tags.is_empty() {
            info!("No related tags for '{}' on {}", tag, date);
            return Err(Error::not_found("Related tags not found"));
        }
        debug!("Related tags for '{}': {:?}", tag, related_tags);

        Ok(TagSummary::new(tag, articles, related_tags))
    }
}

fn check_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(Error::InvalidTag("tag must not be empty".to_string()));
    }
    Ok(())
}
