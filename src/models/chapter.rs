use serde::{Deserialize, Serialize};

use super::DiffViewMode;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chapter {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub word_count: i64,
    pub char_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChapterVersion {
    pub id: String,
    pub chapter_id: String,
    pub version_number: i64,
    pub title: String,
    pub content: String,
    pub word_count: i64,
    pub char_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChapterVersionSummary {
    pub id: String,
    pub chapter_id: String,
    pub version_number: i64,
    pub title: String,
    pub word_count: i64,
    pub char_count: i64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// `PUT /chapters/{id}/content` 본문. 제목이 없으면 기존 제목을 유지합니다.
#[derive(Debug, Deserialize)]
pub struct UpdateChapterContentRequest {
    pub title: Option<String>,
    pub content: String,
}

/// `GET /chapters/{id}/diff?base=...&mode=split`
#[derive(Debug, Deserialize)]
pub struct ChapterDiffQuery {
    /// 비교 기준이 되는 버전 ID (왼쪽/old 쪽)
    pub base: String,
    #[serde(default)]
    pub mode: DiffViewMode,
}
