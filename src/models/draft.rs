//! # 초안(Draft) 모델 정의
//!
//! 자동 저장된, 아직 발행되지 않은 챕터 스냅샷을 표현하는 구조체들입니다.
//!
//! ## 초안 라이프사이클
//! ```text
//! enable_auto_save() → 새 draft_id 발급 → save_draft_content() 반복
//!                    → disable_auto_save() (삭제하지 않음)
//!                    → 다시 enable 하면 새 draft_id (재사용하지 않음)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// DB의 `drafts` 테이블 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DraftRow {
    pub id: String,
    pub user_id: String,
    pub chapter_id: Option<String>,
    pub title: String,
    pub content: String,
    /// 본문의 SHA-256 (hex). 같은 내용의 재저장을 걸러냅니다.
    pub content_hash: String,
    pub word_count: i64,
    pub char_count: i64,
    pub auto_save_enabled: i64,
    /// ISO 8601 UTC (예: "2026-02-16T12:00:00.000Z")
    pub last_saved_at: String,
    pub created_at: String,
}

impl DraftRow {
    /// 저장소 행을 도메인 레코드로 변환합니다.
    ///
    /// `last_saved_at`은 SQLite의 `strftime('%Y-%m-%dT%H:%M:%fZ')` 형식이므로
    /// RFC 3339로 파싱됩니다. 파싱에 실패하면 저장소가 손상된 것으로 보고 내부 에러를 냅니다.
    pub fn into_record(self) -> Result<DraftRecord, AppError> {
        let last_saved_at = DateTime::parse_from_rfc3339(&self.last_saved_at)
            .map_err(|e| {
                AppError::Internal(format!(
                    "draft {} has malformed last_saved_at {:?}: {}",
                    self.id, self.last_saved_at, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(DraftRecord {
            draft_id: self.id,
            chapter_id: self.chapter_id,
            title: self.title,
            content: self.content,
            last_saved_at,
            word_count: Some(self.word_count.max(0) as usize),
            char_count: Some(self.char_count.max(0) as usize),
        })
    }
}

/// 영속화 계층이 돌려주는 초안 레코드
///
/// 단어 수/글자 수는 상위에서 이미 계산했을 수도, 아닐 수도 있으므로 `Option`입니다.
/// 복구 컨트롤러(`services::recovery`)가 비어 있는 값을 채웁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub draft_id: String,
    /// 발행된 챕터를 편집 중인 초안이면 해당 챕터 ID
    pub chapter_id: Option<String>,
    pub title: String,
    /// 직렬화된 리치 텍스트 마크업
    pub content: String,
    pub last_saved_at: DateTime<Utc>,
    #[serde(default)]
    pub word_count: Option<usize>,
    #[serde(default)]
    pub char_count: Option<usize>,
}

/// `PUT /drafts/content`: saveDraftContent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDraftRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub draft_id: Option<String>,
    #[serde(default)]
    pub chapter_id: Option<String>,
}

/// `POST /drafts/autosave/enable`, `POST /drafts/autosave/disable` 공용 본문
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoSaveToggleRequest {
    #[serde(default)]
    pub draft_id: Option<String>,
    #[serde(default)]
    pub chapter_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftIdResponse {
    pub draft_id: String,
}
