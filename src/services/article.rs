use log::info;
use std::sync::Arc;

use crate::base::repository_traits::ArticleRepository;
use crate::error::Result;
use crate::models::article::{Article, ArticleId, NewArticle};
use crate::validation;

#[derive(Clone)]
pub struct ArticleService {
    repository: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_article(&self, id: ArticleId) -> Result<Article> {
        self.repository.get_article_by_id(id).await
    }

    /// Validates the payload and persists it, returning the assigned id.
    /// Invalid payloads never reach the store.
    pub async fn create_article(&self, article: &NewArticle) -> Result<ArticleId> {
        validation::validate(article)?;
        let id = self.repository.add_article(article).await?;
        info!("Created article {} with {} tags", id, article.tags.len());
        Ok(id)
    }
}
