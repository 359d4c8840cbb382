use actix_web::{web, HttpResponse};
use log::debug;
use serde::Serialize;

use super::AppState;
use crate::error::{Error, Result};
use crate::models::article::{ArticleId, NewArticle};

/// Body returned once an article has been stored
#[derive(Debug, Serialize)]
pub struct CreatedArticle {
    pub id: ArticleId,
}

/// GET /articles/{id}
pub async fn get_article(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let raw = path.into_inner();
    // the route only admits digits, so a parse failure means the id overflows i64
    let id: ArticleId = raw
        .parse()
        .map_err(|_| Error::not_found(format!("Article {} not found", raw)))?;

    let article = state.articles.get_article(id).await?;
    Ok(HttpResponse::Ok().json(article))
}

/// POST /articles
pub async fn create_article(
    state: web::Data<AppState>,
    payload: web::Json<NewArticle>,
) -> Result<HttpResponse> {
    let article = payload.into_inner();
    debug!("Create article request '{}'", article.title);
    let id = state.articles.create_article(&article).await?;
    Ok(HttpResponse::Ok().json(CreatedArticle { id }))
}
