use async_trait::async_trait;

use crate::error::Result;
use crate::models::article::{Article, ArticleId, NewArticle};
use crate::models::tag::TagDate;

// ==================== ArticleRepository ====================
/// Data-access contract for articles. Implementations hold no request state;
/// the only shared resource is the connection handle.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Point lookup; `Error::NotFound` when no row matches
    async fn get_article_by_id(&self, id: ArticleId) -> Result<Article>;

    /// Persists a payload and returns the id assigned by the store's sequence
    async fn add_article(&self, article: &NewArticle) -> Result<ArticleId>;

    /// Ids of articles carrying `tag` on `date`, in store order. Zero matches is `Ok(vec![])`.
    async fn get_articles_for_tag_and_date(&self, tag: &str, date: TagDate)
        -> Result<Vec<ArticleId>>;

    /// Tags co-occurring with `tag` on the given articles.
    ///
    /// Articles that no longer carry `tag` are skipped. The result never
    /// contains `tag` and holds no duplicates.
    async fn get_related_tags_for_tag(&self, tag: &str, article_ids: &[ArticleId])
        -> Result<Vec<String>>;

    /// Releases the underlying connections. Call once, at shutdown.
    fn close(&self);
}
