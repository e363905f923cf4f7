//! # 초안(Draft) 데이터베이스 쿼리 모듈
//!
//! 자동 저장 초안의 저장, 자동 저장 켜기/끄기, 목록 조회, 삭제를 담당합니다.
//! 모든 쿼리는 `user_id`로 범위를 좁히므로 다른 사용자의 초안은 "없는 것"으로 보입니다.
//!
//! ## 초안 라이프사이클
//! ```text
//! enable_auto_save(None)      → INSERT (auto_save_enabled = 1) → 새 draft_id
//! save_draft_content(id, ...) → UPDATE (내용이 같으면 건너뜀)
//! disable_auto_save(id)       → UPDATE auto_save_enabled = 0 (행은 남김)
//! delete_draft(id)            → DELETE (사용자가 "버리기"를 누른 경우)
//! ```
//!
//! 여러 기기에서 같은 초안을 동시에 저장하면 마지막 쓰기가 이깁니다 (버전 검사 없음).

use crate::error::AppError;
use crate::models::{DraftRow, SaveDraftRequest};
use crate::services::text::{content_digest, count_chars, count_words};
use sqlx::SqlitePool;

const DRAFT_COLUMNS: &str = r#"
    id, user_id, chapter_id, title, content, content_hash,
    word_count, char_count, auto_save_enabled, last_saved_at, created_at
"#;

/// 사용자의 모든 초안을 최근 저장순으로 조회합니다.
pub async fn list_drafts(pool: &SqlitePool, user_id: &str) -> Result<Vec<DraftRow>, AppError> {
    let drafts = sqlx::query_as::<_, DraftRow>(&format!(
        "SELECT {DRAFT_COLUMNS} FROM drafts WHERE user_id = ? ORDER BY last_saved_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(drafts)
}

pub async fn get_draft(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<DraftRow>, AppError> {
    let draft = sqlx::query_as::<_, DraftRow>(&format!(
        "SELECT {DRAFT_COLUMNS} FROM drafts WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(draft)
}

/// 새 초안 행을 만듭니다. ID는 UUIDv7이며 절대 재사용되지 않습니다.
pub async fn create_draft(
    pool: &SqlitePool,
    user_id: &str,
    chapter_id: Option<&str>,
    title: &str,
    content: &str,
    auto_save_enabled: bool,
) -> Result<DraftRow, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO drafts (id, user_id, chapter_id, title, content, content_hash,
                            word_count, char_count, auto_save_enabled)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(chapter_id)
    .bind(title)
    .bind(content)
    .bind(content_digest(content))
    .bind(count_words(content) as i64)
    .bind(count_chars(content) as i64)
    .bind(auto_save_enabled as i64)
    .execute(pool)
    .await?;

    tracing::debug!(draft_id = %id, user_id, "draft created");

    get_draft(pool, &id, user_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created draft".to_string()))
}

/// 초안 본문을 저장합니다 (saveDraftContent).
///
/// ## 반환값
/// - `Ok(Some(draft_id))`: 저장 성공 (또는 내용이 같아서 건너뜀)
/// - `Ok(None)`: `draft_id`를 지정했지만 이 사용자의 초안이 아님 → 라우트에서 404
pub async fn save_draft_content(
    pool: &SqlitePool,
    user_id: &str,
    req: &SaveDraftRequest,
) -> Result<Option<String>, AppError> {
    let Some(draft_id) = req.draft_id.as_deref() else {
        let draft = create_draft(
            pool,
            user_id,
            req.chapter_id.as_deref(),
            &req.title,
            &req.content,
            false,
        )
        .await?;
        return Ok(Some(draft.id));
    };

    let Some(existing) = get_draft(pool, draft_id, user_id).await? else {
        return Ok(None);
    };

    let hash = content_digest(&req.content);
    if existing.content_hash == hash && existing.title == req.title {
        tracing::debug!(draft_id, "draft unchanged, skipping write");
        return Ok(Some(existing.id));
    }

    sqlx::query(
        r#"
        UPDATE drafts
        SET title = ?, content = ?, content_hash = ?, word_count = ?, char_count = ?,
            chapter_id = COALESCE(?, chapter_id),
            last_saved_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&req.title)
    .bind(&req.content)
    .bind(&hash)
    .bind(count_words(&req.content) as i64)
    .bind(count_chars(&req.content) as i64)
    .bind(req.chapter_id.as_deref())
    .bind(draft_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(Some(existing.id))
}

/// 자동 저장을 켭니다 (enableAutoSave).
///
/// `draft_id`가 있으면 그 초안을 다시 켜고, 없으면 빈 초안을 새로 만듭니다.
/// 지정한 초안이 이 사용자의 것이 아니면 `Ok(None)`.
pub async fn enable_auto_save(
    pool: &SqlitePool,
    user_id: &str,
    draft_id: Option<&str>,
    chapter_id: Option<&str>,
) -> Result<Option<String>, AppError> {
    match draft_id {
        Some(id) => {
            let result = sqlx::query(
                r#"
                UPDATE drafts
                SET auto_save_enabled = 1, chapter_id = COALESCE(?, chapter_id)
                WHERE id = ? AND user_id = ?
                "#,
            )
            .bind(chapter_id)
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

            Ok((result.rows_affected() > 0).then(|| id.to_string()))
        }
        None => {
            let draft = create_draft(pool, user_id, chapter_id, "", "", true).await?;
            Ok(Some(draft.id))
        }
    }
}

/// 자동 저장을 끕니다 (disableAutoSave). 초안 행은 지우지 않습니다.
///
/// `draft_id`가 없으면 `chapter_id`에 묶인, 켜져 있는 초안들을 끕니다.
/// 둘 다 없으면 400. 대상이 하나도 없으면 `Ok(false)` → 404.
pub async fn disable_auto_save(
    pool: &SqlitePool,
    user_id: &str,
    draft_id: Option<&str>,
    chapter_id: Option<&str>,
) -> Result<bool, AppError> {
    let result = match (draft_id, chapter_id) {
        (Some(id), _) => {
            sqlx::query("UPDATE drafts SET auto_save_enabled = 0 WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?
        }
        (None, Some(chapter_id)) => {
            sqlx::query(
                r#"
                UPDATE drafts SET auto_save_enabled = 0
                WHERE chapter_id = ? AND user_id = ? AND auto_save_enabled = 1
                "#,
            )
            .bind(chapter_id)
            .bind(user_id)
            .execute(pool)
            .await?
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "draft_id or chapter_id is required".to_string(),
            ))
        }
    };

    Ok(result.rows_affected() > 0)
}

/// 초안을 삭제합니다. 삭제된 행이 있으면 true.
pub async fn delete_draft(pool: &SqlitePool, id: &str, user_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM drafts WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
