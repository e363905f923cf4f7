//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 조립 함수입니다.
//!
//! - `chapters`: 챕터, 챕터 버전, 버전 diff
//! - `diff`: 임의 텍스트 diff
//! - `drafts`: 자동 저장 초안 (영속화 협력자 API)
//! - `health`: 헬스체크

pub mod chapters;
pub mod diff;
pub mod drafts;
pub mod health;

use std::path::Path;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `SqlitePool`은 내부적으로 Arc이므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// 인증 SDK와 공유하는 액세스 토큰 서명 키
    pub jwt_secret: String,
    /// 챕터당 남겨둘 최대 버전 수
    pub max_chapter_versions: u32,
    /// diff 입력 한쪽의 최대 줄 수
    pub max_diff_lines: usize,
    /// LCS 테이블 칸 수 상한 (두 입력 줄 수의 곱으로 메모리가 정해짐)
    pub max_diff_cells: usize,
}

/// `/api/v1` 아래에 붙는 API 라우트
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // 초안 (자동 저장 영속화)
        .route("/drafts", get(drafts::list_drafts))
        .route("/drafts/content", put(drafts::save_draft_content))
        .route("/drafts/autosave/enable", post(drafts::enable_auto_save))
        .route("/drafts/autosave/disable", post(drafts::disable_auto_save))
        .route("/drafts/{id}", delete(drafts::delete_draft))
        // 챕터와 버전
        .route("/chapters", post(chapters::create_chapter))
        .route("/chapters/{id}", get(chapters::get_chapter))
        .route("/chapters/{id}/content", put(chapters::update_chapter_content))
        .route("/chapters/{id}/versions", get(chapters::list_chapter_versions))
        .route(
            "/chapters/{id}/versions/{version_id}",
            get(chapters::get_chapter_version),
        )
        .route("/chapters/{id}/diff", get(chapters::chapter_diff))
        // 임의 텍스트 diff
        .route("/diff", post(diff::diff_texts))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// 전체 애플리케이션 라우터
///
/// `frontend_dist`가 있으면 API 밖의 경로는 프론트엔드 정적 파일로 보내고,
/// 찾을 수 없는 경로는 index.html로 돌려보냅니다 (SPA 라우팅).
pub fn app(state: AppState, frontend_dist: Option<&Path>) -> Router {
    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().nest("/api/v1", api_router(state));

    let router = match frontend_dist {
        Some(dist) => {
            tracing::info!("Serving frontend static files from {}", dist.display());
            let serve_dir =
                ServeDir::new(dist).not_found_service(ServeFile::new(dist.join("index.html")));
            router.fallback_service(serve_dir)
        }
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}
