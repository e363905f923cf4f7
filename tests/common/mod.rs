//! 통합 테스트 공용 헬퍼

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use storychain::middleware::auth::create_access_token;
use storychain::routes::{self, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// 마이그레이션을 적용한 인메모리 DB
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 되므로 연결을 하나로 고정합니다.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState {
        pool,
        jwt_secret: TEST_SECRET.to_string(),
        max_chapter_versions: 3,
        max_diff_lines: 200,
        max_diff_cells: 10_000,
    }
}

/// `main.rs`와 같은 라우터(CORS, 트레이스 레이어 포함). 정적 파일 서빙은 뺍니다.
pub async fn build_test_app() -> Router {
    routes::app(test_state(test_pool().await), None)
}

pub fn token_for(user_id: &str) -> String {
    create_access_token(user_id, TEST_SECRET, chrono::Duration::hours(1)).expect("token")
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// 상태 코드를 확인하고 JSON 본문을 돌려줍니다.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
