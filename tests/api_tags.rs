mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use article_api::{handlers, NewArticle};
use common::{article_json, send, TestHarness};

#[actix_web::test]
async fn tag_summary_end_to_end() {
    let harness = TestHarness::sqlite();
    let app = test::init_service(App::new().app_data(harness.state()).configure(handlers::configure)).await;

    let mut ids = Vec::new();
    for payload in [
        article_json("Article1", "2023-02-20", &["health", "fitness"]),
        article_json("Article2", "2023-02-20", &["health", "yoga"]),
        article_json("Article3", "2023-02-21", &["health", "running"]),
    ] {
        let (status, body) = send(&app, test::TestRequest::post().uri("/articles").set_json(&payload)).await;
        assert_eq!(status, StatusCode::OK);
        ids.push(body["id"].clone());
    }

    let (status, body) = send(&app, test::TestRequest::get().uri("/tags/health/20230220")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tag"], "health");
    assert_eq!(body["count"], 2);
    assert_eq!(body["articles"], serde_json::json!([ids[0], ids[1]]));

    let mut related: Vec<String> = body["related_tags"]
        .as_array()
        .expect("related tags")
        .iter()
        .filter_map(|t| t.as_str().map(str::to_string))
        .collect();
    related.sort();
    assert_eq!(related, vec!["fitness", "yoga"]);
}

#[actix_web::test]
async fn invalid_dates_are_400_without_store_access() {
    let harness = TestHarness::memory(vec![NewArticle::new(
        "Article1",
        "...",
        "2023-02-20",
        &["health", "fitness"],
    )]);
    let app = test::init_service(App::new().app_data(harness.state()).configure(handlers::configure)).await;

    for uri in [
        "/tags/health/99999999",
        "/tags/health/20230230",
        "/tags/health/2023022",
        "/tags/health/2023-02-20",
    ] {
        let (status, body) = send(&app, test::TestRequest::get().uri(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["message"].is_string(), "{uri}");
    }
    assert_eq!(harness.memory_calls(), 0);
}

#[actix_web::test]
async fn unmatched_tag_is_404() {
    let harness = TestHarness::sqlite();
    let app = test::init_service(App::new().app_data(harness.state()).configure(handlers::configure)).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/tags/health/20230220")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Articles with given tag not found");
}

#[actix_web::test]
async fn lone_tag_has_no_related_tags() {
    let harness = TestHarness::memory(vec![NewArticle::new(
        "Article1",
        "...",
        "2023-02-20",
        &["health"],
    )]);
    let app = test::init_service(App::new().app_data(harness.state()).configure(handlers::configure)).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/tags/health/20230220")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Related tags not found");
    assert_eq!(harness.memory_calls(), 2);
}

#[actix_web::test]
async fn store_failure_is_500() {
    let harness = TestHarness::memory(Vec::new());
    harness.memory.as_ref().expect("memory store").set_failing(true);
    let app = test::init_service(App::new().app_data(harness.state()).configure(handlers::configure)).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/tags/health/20230220")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}
