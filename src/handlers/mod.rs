pub mod articles;
pub mod errors;
pub mod tags;

use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use log::debug;
use std::sync::Arc;

use crate::base::repository_traits::ArticleRepository;
use crate::services::{ArticleService, TagService};
use errors::GenericError;

/// Services shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub articles: ArticleService,
    pub tags: TagService,
}

impl AppState {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self {
            articles: ArticleService::new(repository.clone()),
            tags: TagService::new(repository),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.route("/articles", web::post().to(articles::create_article));
    cfg.route("/articles/{id:\\d+}", web::get().to(articles::get_article));
    cfg.route("/tags/{tag}/{date}", web::get().to(tags::get_tag_summary));
}

/// Any origin may call the API; responses carry `Access-Control-Allow-Origin: *`
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
}

/// Unreadable JSON bodies answer 400 with the usual `{"message"}` envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("Rejected request body: {}", err);
        let response = HttpResponse::BadRequest().json(GenericError::new(format!(
            "Invalid request body: {}",
            err
        )));
        InternalError::from_response(err, response).into()
    })
}
