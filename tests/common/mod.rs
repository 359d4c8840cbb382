#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use article_api::data::{Database, InMemoryArticleRepository};
use article_api::{AppState, ArticleRepository, NewArticle};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

/// Backing store for one test app. The temp dir lives as long as the harness.
pub struct TestHarness {
    pub repository: Arc<dyn ArticleRepository>,
    pub memory: Option<Arc<InMemoryArticleRepository>>,
    _dir: Option<TempDir>,
}

impl TestHarness {
    /// App over a fresh SQLite file
    pub fn sqlite() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("articles.db"), 2).expect("open database");
        Self {
            repository: database.article_repository(),
            memory: None,
            _dir: Some(dir),
        }
    }

    /// App over the in-memory double, seeded with `articles`
    pub fn memory(articles: Vec<NewArticle>) -> Self {
        let memory = Arc::new(InMemoryArticleRepository::with_articles(articles));
        Self {
            repository: memory.clone(),
            memory: Some(memory),
            _dir: None,
        }
    }

    pub fn memory_calls(&self) -> usize {
        self.memory.as_ref().map(|m| m.calls()).unwrap_or(0)
    }

    pub fn state(&self) -> web::Data<AppState> {
        web::Data::new(AppState::new(self.repository.clone()))
    }
}

pub fn article_json(title: &str, date: &str, tags: &[&str]) -> Value {
    serde_json::json!({
        "title": title,
        "body": format!("{} body", title),
        "date": date,
        "tags": tags,
    })
}

/// Sends the request and returns the status with the parsed JSON body
pub async fn send<S, B>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}
