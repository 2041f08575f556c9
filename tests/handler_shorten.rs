mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use serde_json::json;
use snaplink::api::handlers::shorten_handler;
use snaplink::routes::router;
use sqlx::SqlitePool;

fn shorten_server(pool: SqlitePool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/api/shorten", post(shorten_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_shorten_success(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .add_header("Host", "s.example.com")
        .json(&json!({ "url": "https://example.com/page" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["short"], format!("http://s.example.com/{code}"));

    assert_eq!(
        common::target_of(&pool, code).await.as_deref(),
        Some("https://example.com/page")
    );
    assert_eq!(common::clicks_of(&pool, code).await, 0);
}

#[sqlx::test]
async fn test_shorten_without_scheme_then_redirect(pool: SqlitePool) {
    let server = TestServer::new(router(common::create_test_state(pool.clone()))).unwrap();

    let response = server
        .post("/api/shorten")
        .add_header("Host", "s.example.com")
        .json(&json!({ "url": "example.com" }))
        .await;

    response.assert_status_ok();
    let code = response.json::<serde_json::Value>()["code"]
        .as_str()
        .unwrap()
        .to_string();

    assert_eq!(
        common::target_of(&pool, &code).await.as_deref(),
        Some("https://example.com")
    );

    let redirect = server.get(&format!("/{code}")).await;
    assert_eq!(redirect.status_code(), 302);
    assert_eq!(redirect.header("location"), "https://example.com");
    assert_eq!(common::clicks_of(&pool, &code).await, 1);
}

#[sqlx::test]
async fn test_shorten_empty_url(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "URL is required");
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_whitespace_url(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "   " }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_missing_url_field(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server.post("/api/shorten").json(&json!({})).await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "URL is required");
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_invalid_url(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "Invalid URL");
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_unsupported_scheme(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_mailto_is_not_prefixed(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "mailto:a@b.com" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "Invalid URL");
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_host_with_port_gets_https(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com:8080/x" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(
        common::target_of(&pool, code).await.as_deref(),
        Some("https://example.com:8080/x")
    );
}

#[sqlx::test]
async fn test_shorten_oversized_url(pool: SqlitePool) {
    let server = shorten_server(pool.clone());
    let url = format!("https://example.com/{}", "a".repeat(4096));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": url }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_wrong_field_type(pool: SqlitePool) {
    let server = shorten_server(pool.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": 42 }))
        .await;

    response.assert_status_bad_request();
    assert!(response.json::<serde_json::Value>()["error"].is_string());
    assert_eq!(common::count_links(&pool).await, 0);
}

#[sqlx::test]
async fn test_shorten_same_url_twice_gives_distinct_codes(pool: SqlitePool) {
    let server = TestServer::new(router(common::create_test_state(pool.clone()))).unwrap();

    let first = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://dedup.example.com" }))
        .await
        .json::<serde_json::Value>();
    let second = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://dedup.example.com" }))
        .await
        .json::<serde_json::Value>();

    let code1 = first["code"].as_str().unwrap();
    let code2 = second["code"].as_str().unwrap();
    assert_ne!(code1, code2);
    assert_eq!(common::count_links(&pool).await, 2);

    for code in [code1, code2] {
        let response = server.get(&format!("/{code}")).await;
        assert_eq!(response.status_code(), 302);
        assert_eq!(response.header("location"), "https://dedup.example.com");
    }
}

#[sqlx::test]
async fn test_shorten_short_url_keeps_host_port(pool: SqlitePool) {
    let server = shorten_server(pool);

    let response = server
        .post("/api/shorten")
        .add_header("Host", "localhost:8080")
        .json(&json!({ "url": "example.com" }))
        .await;

    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(json["short"], format!("http://localhost:8080/{code}"));
}

#[sqlx::test]
async fn test_shorten_ignores_forwarded_headers_by_default(pool: SqlitePool) {
    let server = shorten_server(pool);

    let response = server
        .post("/api/shorten")
        .add_header("Host", "internal:3000")
        .add_header("X-Forwarded-Host", "s.example.com")
        .add_header("X-Forwarded-Proto", "https")
        .json(&json!({ "url": "example.com" }))
        .await;

    let json = response.json::<serde_json::Value>();
    let short = json["short"].as_str().unwrap();
    assert!(short.starts_with("http://internal:3000/"));
}

#[sqlx::test]
async fn test_shorten_behind_proxy_uses_forwarded_headers(pool: SqlitePool) {
    let mut state = common::create_test_state(pool);
    state.behind_proxy = true;
    let app = Router::new()
        .route("/api/shorten", post(shorten_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/shorten")
        .add_header("Host", "internal:3000")
        .add_header("X-Forwarded-Host", "s.example.com")
        .add_header("X-Forwarded-Proto", "https")
        .json(&json!({ "url": "example.com" }))
        .await;

    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(json["short"], format!("https://s.example.com/{code}"));
}
