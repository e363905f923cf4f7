//! # 챕터 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/v1/chapters`                          → 챕터 생성
//! - `GET    /api/v1/chapters/{id}`                     → 챕터 조회
//! - `PUT    /api/v1/chapters/{id}/content`             → 본문 교체 (이전 본문은 버전으로 남음)
//! - `GET    /api/v1/chapters/{id}/versions`            → 버전 목록 (최신순)
//! - `GET    /api/v1/chapters/{id}/versions/{version}`  → 버전 본문
//! - `GET    /api/v1/chapters/{id}/diff?base=...`       → 버전 대비 현재 본문 diff

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::{diff::render_diff, AppState},
};

/// `POST /chapters`
pub async fn create_chapter(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Json<Chapter>, AppError> {
    let title = req.title.as_deref().unwrap_or("Untitled");
    let content = req.content.as_deref().unwrap_or("");

    let chapter = db::create_chapter(&state.pool, &auth_user.user_id, title, content).await?;
    tracing::info!(chapter_id = %chapter.id, author = %auth_user.user_id, "chapter created");
    Ok(Json(chapter))
}

/// `GET /chapters/{id}`
pub async fn get_chapter(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Chapter>, AppError> {
    let chapter = db::get_chapter(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(chapter))
}

/// `PUT /chapters/{id}/content`: 작성자만 수정할 수 있습니다.
pub async fn update_chapter_content(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateChapterContentRequest>,
) -> Result<Json<Chapter>, AppError> {
    let chapter = db::update_chapter_content(
        &state.pool,
        &id,
        &auth_user.user_id,
        req.title.as_deref(),
        &req.content,
        state.max_chapter_versions,
    )
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(Json(chapter))
}

/// `GET /chapters/{id}/versions` → `{ "versions": [...] }`
pub async fn list_chapter_versions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_chapter(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let versions = db::list_versions(&state.pool, &id).await?;
    Ok(Json(json!({ "versions": versions })))
}

/// `GET /chapters/{id}/versions/{version_id}`
pub async fn get_chapter_version(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path((id, version_id)): Path<(String, String)>,
) -> Result<Json<ChapterVersion>, AppError> {
    let version = db::get_version(&state.pool, &version_id)
        .await?
        .filter(|v| v.chapter_id == id)
        .ok_or(AppError::NotFound)?;
    Ok(Json(version))
}

/// `GET /chapters/{id}/diff?base={version_id}&mode=unified|split`
///
/// 기준 버전(old)과 현재 본문(new)을 HTML 제거 후 비교합니다.
pub async fn chapter_diff(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<ChapterDiffQuery>,
) -> Result<Json<DiffView>, AppError> {
    let chapter = db::get_chapter(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let base = db::get_version(&state.pool, &query.base)
        .await?
        .filter(|v| v.chapter_id == chapter.id)
        .ok_or(AppError::NotFound)?;

    let view = render_diff(&state, &base.content, &chapter.content, query.mode, false).await?;
    Ok(Json(view))
}
