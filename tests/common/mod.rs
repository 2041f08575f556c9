#![allow(dead_code)]

use snaplink::application::services::LinkService;
use snaplink::infrastructure::persistence::SqliteLinkRepository;
use snaplink::state::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const PUBLIC_URL: &str = "http://localhost:3000";

pub async fn create_test_link(pool: &SqlitePool, code: &str, target: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (code, target) VALUES (?1, ?2) RETURNING id")
        .bind(code)
        .bind(target)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn set_clicks(pool: &SqlitePool, code: &str, clicks: i64) {
    sqlx::query("UPDATE links SET clicks = ?1 WHERE code = ?2")
        .bind(clicks)
        .bind(code)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn clicks_of(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM links WHERE code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn target_of(pool: &SqlitePool, code: &str) -> Option<String> {
    sqlx::query_scalar("SELECT target FROM links WHERE code = ?1")
        .bind(code)
        .fetch_optional(pool)
        .await
        .unwrap()
}

pub async fn count_links(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_service(pool: SqlitePool) -> LinkService {
    let link_repo = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
    LinkService::new(link_repo)
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    AppState::new(
        Arc::new(create_test_service(pool)),
        false,
        PUBLIC_URL.to_string(),
    )
}
