use async_trait::async_trait;
use log::{debug, error, info, warn};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::RwLock;

use crate::base::repository_traits::ArticleRepository;
use crate::error::{Error, Result, StoreError};
use crate::models::article::{Article, ArticleId, NewArticle};
use crate::models::tag::TagDate;
use crate::services::tag::collect_related_tags;

// Wrapper type for the JSON-encoded `tags` column
#[derive(Debug)]
struct TagList(Vec<String>);

impl FromSql for TagList {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = String::column_result(value)?;
        serde_json::from_str(&raw)
            .map(TagList)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for TagList {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        serde_json::to_string(&self.0)
            .map(ToSqlOutput::from)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }
}

impl ToSql for ArticleId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for ArticleId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(ArticleId)
    }
}

const SELECT_ARTICLE_BY_ID: &str = "SELECT id, title, date, body, tags FROM articles WHERE id = ?1";

const INSERT_ARTICLE: &str =
    "INSERT INTO articles (title, date, body, tags) VALUES (?1, ?2, ?3, ?4) RETURNING id";

const SELECT_IDS_FOR_TAG_AND_DATE: &str = "SELECT a.id FROM articles a
     WHERE a.date = ?1
       AND EXISTS (SELECT 1 FROM json_each(a.tags) AS t WHERE t.value = ?2)
     ORDER BY a.id";

// One query for the whole id list; rows come back in the caller's order and
// articles that lost the anchor tag are skipped.
const SELECT_TAGS_FOR_IDS: &str = "SELECT a.tags FROM json_each(?1) AS ids
     JOIN articles a ON a.id = ids.value
     WHERE EXISTS (SELECT 1 FROM json_each(a.tags) AS t WHERE t.value = ?2)
     ORDER BY ids.key";

/// SQLite-based article repository implementation
pub struct SqliteArticleRepository {
    pool: RwLock<Option<Pool<SqliteConnectionManager>>>,
}

impl SqliteArticleRepository {
    /// Creates a new SQLite article repository
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: RwLock::new(Some(pool)),
        }
    }

    /// Maps a database row to an Article
    fn map_row(row: &Row) -> rusqlite::Result<Article> {
        let TagList(tags) = row.get(4)?;
        Ok(Article {
            id: row.get(0)?,
            title: row.get(1)?,
            date: row.get(2)?,
            body: row.get(3)?,
            tags,
        })
    }

    fn checkout_pool(&self) -> Result<Pool<SqliteConnectionManager>> {
        let slot = self.pool.read().map_err(|_| StoreError::Poisoned)?;
        slot.as_ref().cloned().ok_or_else(|| StoreError::Closed.into())
    }

    /// Runs `task` on the blocking pool with a pooled connection
    async fn with_connection<F, R>(&self, context: &'static str, task: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let pool = self.checkout_pool()?;
        let outcome = tokio::task::spawn_blocking(move || -> Result<R> {
            let conn = pool.get()?;
            task(&conn)
        })
        .await
        .map_err(|err| StoreError::Blocking {
            context,
            message: err.to_string(),
        })?;

        if let Err(Error::Store(err)) = &outcome {
            error!("{} failed: {}", context, err);
        }
        outcome
    }
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    async fn get_article_by_id(&self, id: ArticleId) -> Result<Article> {
        info!("Get article {}", id);
        let article = self
            .with_connection("get_article_by_id", move |conn| {
                let mut stmt = conn.prepare_cached(SELECT_ARTICLE_BY_ID)?;
                Ok(stmt.query_row([id], Self::map_row).optional()?)
            })
            .await?;

        article.ok_or_else(|| Error::not_found(format!("Article {} not found", id)))
    }

    async fn add_article(&self, article: &NewArticle) -> Result<ArticleId> {
        info!("Add new article '{}'", article.title);
        let article = article.clone();
        let id = self
            .with_connection("add_article", move |conn| {
                let mut stmt = conn.prepare_cached(INSERT_ARTICLE)?;
                let id = stmt.query_row(
                    params![
                        article.title,
                        article.date,
                        article.body,
                        TagList(article.tags)
                    ],
                    |row| row.get::<_, ArticleId>(0),
                )?;
                Ok(id)
            })
            .await?;

        info!("Inserted article {}", id);
        Ok(id)
    }

    async fn get_articles_for_tag_and_date(
        &self,
        tag: &str,
        date: TagDate,
    ) -> Result<Vec<ArticleId>> {
        debug!("Get articles for tag '{}' on {}", tag, date);
        let tag = tag.to_string();
        self.with_connection("get_articles_for_tag_and_date", move |conn| {
            let mut stmt = conn.prepare_cached(SELECT_IDS_FOR_TAG_AND_DATE)?;
            let ids = stmt
                .query_map(params![date.to_article_date(), tag], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<ArticleId>>>()?;
            Ok(ids)
        })
        .await
    }

    async fn get_related_tags_for_tag(
        &self,
        tag: &str,
        article_ids: &[ArticleId],
    ) -> Result<Vec<String>> {
        debug!("Get related tags for '{}' across {} articles", tag, article_ids.len());
        if article_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tag = tag.to_string();
        let ids = serde_json::to_string(article_ids)?;
        self.with_connection("get_related_tags_for_tag", move |conn| {
            let mut stmt = conn.prepare_cached(SELECT_TAGS_FOR_IDS)?;
            let tag_sets = stmt
                .query_map(params![ids, tag], |row| row.get::<_, TagList>(0))?
                .map(|tags| tags.map(|TagList(tags)| tags))
                .collect::<rusqlite::Result<Vec<Vec<String>>>>()?;
            Ok(collect_related_tags(&tag, tag_sets))
        })
        .await
    }

    fn close(&self) {
        match self.pool.write() {
            Ok(mut slot) => {
                if slot.take().is_some() {
                    info!("Database connection pool closed");
                } else {
                    warn!("Database connection pool already closed");
                }
            }
            Err(_) => error!("Could not close database: handle lock poisoned"),
        }
    }
}
