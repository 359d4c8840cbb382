use actix_web::{web, HttpResponse};

use super::AppState;
use crate::error::Result;

/// GET /tags/{tag}/{date}
pub async fn get_tag_summary(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (tag, date) = path.into_inner();
    let summary = state.tags.tag_summary(&tag, &date).await?;
    Ok(HttpResponse::Ok().json(summary))
}
