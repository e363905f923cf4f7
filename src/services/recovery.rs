//! # 초안 복구 컨트롤러
//!
//! 편집 세션을 시작할 때 이전에 자동 저장된 초안 목록을 받아
//! "이어서 쓰기 / 버리기" 배너에 필요한 상태를 제공합니다.
//!
//! 컨트롤러는 초안을 읽기만 합니다. 실제 복구와 삭제는 호출자가 넘긴 콜백이 처리합니다.
//! 초안 목록을 가져오지 못한 경우(None)도 "초안 없음"으로 취급하며, 자체 에러 상태는 없습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::DraftRecord;

use super::text::{count_chars, count_words};

/// 배너와 목록에 표시하는 초안 뷰
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftData {
    pub draft_id: String,
    pub chapter_id: Option<String>,
    pub title: String,
    pub content: String,
    pub last_saved_at: DateTime<Utc>,
    pub word_count: usize,
    pub char_count: usize,
}

impl DraftData {
    /// 레코드에 단어 수/글자 수가 없으면 본문에서 계산해 채웁니다.
    pub fn from_record(record: DraftRecord) -> Self {
        let word_count = record
            .word_count
            .unwrap_or_else(|| count_words(&record.content));
        let char_count = record
            .char_count
            .unwrap_or_else(|| count_chars(&record.content));

        Self {
            draft_id: record.draft_id,
            chapter_id: record.chapter_id,
            title: record.title,
            content: record.content,
            last_saved_at: record.last_saved_at,
            word_count,
            char_count,
        }
    }
}

impl From<DraftData> for DraftRecord {
    fn from(draft: DraftData) -> Self {
        Self {
            draft_id: draft.draft_id,
            chapter_id: draft.chapter_id,
            title: draft.title,
            content: draft.content,
            last_saved_at: draft.last_saved_at,
            word_count: Some(draft.word_count),
            char_count: Some(draft.char_count),
        }
    }
}

/// 복구 배너의 직렬화 가능한 요약 (`GET /drafts` 응답)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecoverySummary {
    pub has_drafts: bool,
    pub has_multiple_drafts: bool,
    pub latest: Option<DraftData>,
    pub drafts: Vec<DraftData>,
}

#[derive(Debug, Clone, Default)]
pub struct DraftRecovery {
    drafts: Vec<DraftData>,
    dismissed: bool,
}

impl DraftRecovery {
    pub fn new(records: Option<Vec<DraftRecord>>) -> Self {
        let drafts = records
            .unwrap_or_default()
            .into_iter()
            .map(DraftData::from_record)
            .collect();
        Self {
            drafts,
            dismissed: false,
        }
    }

    pub fn drafts(&self) -> &[DraftData] {
        &self.drafts
    }

    pub fn has_drafts(&self) -> bool {
        !self.drafts.is_empty()
    }

    pub fn has_multiple_drafts(&self) -> bool {
        self.drafts.len() > 1
    }

    /// `last_saved_at`이 가장 늦은 초안. 같은 시각이면 목록에서 먼저 나온 것.
    pub fn latest(&self) -> Option<&DraftData> {
        self.drafts.iter().reduce(|latest, draft| {
            if draft.last_saved_at > latest.last_saved_at {
                draft
            } else {
                latest
            }
        })
    }

    /// 선택한 초안으로 복구 콜백을 실행하고 이번 세션의 배너를 닫습니다.
    pub fn recover_draft<R>(
        &mut self,
        draft: &DraftData,
        on_recover: impl FnOnce(&DraftData) -> R,
    ) -> R {
        let result = on_recover(draft);
        tracing::debug!(draft_id = %draft.draft_id, "draft recovered");
        self.dismiss();
        result
    }

    /// 버리기 콜백을 실행합니다. 다른 초안이 남아 있을 수 있으므로 배너는 그대로 둡니다.
    pub fn discard_draft<R>(
        &mut self,
        draft: &DraftData,
        on_discard: impl FnOnce(&DraftData) -> R,
    ) -> R {
        tracing::debug!(draft_id = %draft.draft_id, "draft discarded");
        on_discard(draft)
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    /// 완전히 새로운 편집 세션을 시작할 때 배너를 다시 띄울 수 있게 합니다.
    pub fn reset_dismiss(&mut self) {
        self.dismissed = false;
    }

    /// 배너를 보여줘야 하는지 (초안이 있고 아직 닫히지 않음)
    pub fn should_prompt(&self) -> bool {
        self.has_drafts() && !self.dismissed
    }

    pub fn summary(&self) -> DraftRecoverySummary {
        DraftRecoverySummary {
            has_drafts: self.has_drafts(),
            has_multiple_drafts: self.has_multiple_drafts(),
            latest: self.latest().cloned(),
            drafts: self.drafts.clone(),
        }
    }
}
