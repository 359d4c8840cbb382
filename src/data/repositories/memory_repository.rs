use async_trait::async_trait;
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::base::repository_traits::ArticleRepository;
use crate::error::{Error, Result, StoreError};
use crate::models::article::{Article, ArticleId, NewArticle};
use crate::models::tag::TagDate;
use crate::services::tag::collect_related_tags;

/// In-process stand-in for the SQLite repository.
///
/// Mirrors the production semantics (sequence ids, store-order scans, anchor
/// re-check) and counts every call so tests can assert that no store access
/// happened.
#[derive(Default)]
pub struct InMemoryArticleRepository {
    articles: Mutex<Vec<Article>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    closed: AtomicBool,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository through the normal insert path
    pub fn with_articles(articles: Vec<NewArticle>) -> Self {
        let repository = Self::new();
        {
            let mut rows = repository.articles.lock().expect("fresh article lock");
            for article in articles {
                let id = ArticleId(rows.len() as i64 + 1);
                rows.push(Article::from_new(id, article));
            }
        }
        repository
    }

    /// Number of contract calls made so far (excluding `close`)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every following call fail like a lost connection
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &str) -> Result<MutexGuard<'_, Vec<Article>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("In-memory store call: {}", operation);
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed.into());
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Blocking {
                context: "in-memory store",
                message: format!("{} failed: connection refused", operation),
            }
            .into());
        }
        self.articles.lock().map_err(|_| StoreError::Poisoned.into())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn get_article_by_id(&self, id: ArticleId) -> Result<Article> {
        let rows = self.enter("get_article_by_id")?;
        rows.iter()
            .find(|article| article.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Article {} not found", id)))
    }

    async fn add_article(&self, article: &NewArticle) -> Result<ArticleId> {
        let mut rows = self.enter("add_article")?;
        let next = rows.last().map(|a| a.id.0).unwrap_or(0) + 1;
        let id = ArticleId(next);
        rows.push(Article::from_new(id, article.clone()));
        Ok(id)
    }

    async fn get_articles_for_tag_and_date(
        &self,
        tag: &str,
        date: TagDate,
    ) -> Result<Vec<ArticleId>> {
        let rows = self.enter("get_articles_for_tag_and_date")?;
        let date = date.to_article_date();
        Ok(rows
            .iter()
            .filter(|article| article.date == date && article.has_tag(tag))
            .map(|article| article.id)
            .collect())
    }

    async fn get_related_tags_for_tag(
        &self,
        tag: &str,
        article_ids: &[ArticleId],
    ) -> Result<Vec<String>> {
        let rows = self.enter("get_related_tags_for_tag")?;
        let tag_sets = article_ids.iter().filter_map(|id| {
            rows.iter()
                .find(|article| article.id == *id && article.has_tag(tag))
                .map(|article| article.tags.clone())
        });
        Ok(collect_related_tags(tag, tag_sets))
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
