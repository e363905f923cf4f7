//! # 초안 API 라우트 핸들러
//!
//! 에디터의 자동 저장 상태 머신(`services::autosave`)이 호출하는 영속화 엔드포인트입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/drafts | `list_drafts` | 복구 배너용 초안 요약 |
//! | PUT | /api/v1/drafts/content | `save_draft_content` | 초안 본문 저장 |
//! | POST | /api/v1/drafts/autosave/enable | `enable_auto_save` | 자동 저장 켜기 |
//! | POST | /api/v1/drafts/autosave/disable | `disable_auto_save` | 자동 저장 끄기 |
//! | DELETE | /api/v1/drafts/{id} | `delete_draft` | 초안 버리기 |
//!
//! ## 편집 세션 흐름
//! ```text
//! 1. 에디터 진입 → GET /drafts (이어서 쓸 초안이 있는지)
//! 2. 자동 저장 켜기 → POST /drafts/autosave/enable → draft_id
//! 3. 60초마다 → PUT /drafts/content (내용이 바뀐 경우만)
//! 4. 자동 저장 끄기 → POST /drafts/autosave/disable
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::recovery::{DraftRecovery, DraftRecoverySummary},
};

/// `GET /drafts`: 현재 사용자의 초안과 복구 배너 요약
pub async fn list_drafts(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DraftRecoverySummary>, AppError> {
    let rows = db::list_drafts(&state.pool, &auth_user.user_id).await?;
    let records = rows
        .into_iter()
        .map(DraftRow::into_record)
        .collect::<Result<Vec<_>, _>>()?;

    let recovery = DraftRecovery::new(Some(records));
    Ok(Json(recovery.summary()))
}

/// `PUT /drafts/content`: 초안 본문 저장
///
/// `draft_id`가 없으면 새 초안을 만들고 그 ID를 돌려줍니다.
pub async fn save_draft_content(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<SaveDraftRequest>,
) -> Result<Json<DraftIdResponse>, AppError> {
    let draft_id = db::save_draft_content(&state.pool, &auth_user.user_id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(DraftIdResponse { draft_id }))
}

/// `POST /drafts/autosave/enable`
pub async fn enable_auto_save(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<AutoSaveToggleRequest>,
) -> Result<Json<DraftIdResponse>, AppError> {
    let draft_id = db::enable_auto_save(
        &state.pool,
        &auth_user.user_id,
        req.draft_id.as_deref(),
        req.chapter_id.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    tracing::info!(user_id = %auth_user.user_id, %draft_id, "auto-save enabled");
    Ok(Json(DraftIdResponse { draft_id }))
}

/// `POST /drafts/autosave/disable`: 초안은 남겨둡니다.
pub async fn disable_auto_save(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<AutoSaveToggleRequest>,
) -> Result<StatusCode, AppError> {
    let disabled = db::disable_auto_save(
        &state.pool,
        &auth_user.user_id,
        req.draft_id.as_deref(),
        req.chapter_id.as_deref(),
    )
    .await?;

    if !disabled {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /drafts/{id}`: 초안 버리기
pub async fn delete_draft(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = db::delete_draft(&state.pool, &id, &auth_user.user_id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
