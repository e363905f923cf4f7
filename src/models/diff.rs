//! # Diff 모델 정의
//!
//! 라인 단위 diff 결과와 그 통계, 그리고 렌더러가 받는 뷰 구조체입니다.
//! 계산 로직은 `services::diff`에 있습니다.

use serde::{Deserialize, Serialize};

/// 한 줄의 비교 결과 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Add,
    Remove,
    Unchanged,
}

/// diff 출력의 한 줄
///
/// 줄 번호는 1부터 시작하며, 종류에 따라 채워지는 쪽이 정해져 있습니다:
/// - `Add`: `new_line_number`만
/// - `Remove`: `old_line_number`만
/// - `Unchanged`: 둘 다
///
/// 필드를 직접 채우기보다 `added()` / `removed()` / `unchanged()` 생성자를 쓰세요.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub content: String,
    pub old_line_number: Option<usize>,
    pub new_line_number: Option<usize>,
}

impl DiffLine {
    pub fn added(content: impl Into<String>, new_line: usize) -> Self {
        Self {
            kind: DiffKind::Add,
            content: content.into(),
            old_line_number: None,
            new_line_number: Some(new_line),
        }
    }

    pub fn removed(content: impl Into<String>, old_line: usize) -> Self {
        Self {
            kind: DiffKind::Remove,
            content: content.into(),
            old_line_number: Some(old_line),
            new_line_number: None,
        }
    }

    pub fn unchanged(content: impl Into<String>, old_line: usize, new_line: usize) -> Self {
        Self {
            kind: DiffKind::Unchanged,
            content: content.into(),
            old_line_number: Some(old_line),
            new_line_number: Some(new_line),
        }
    }

    /// 종류와 줄 번호 필드가 서로 맞는지 확인합니다.
    pub fn is_well_formed(&self) -> bool {
        let positive = |n: Option<usize>| n.map_or(true, |n| n >= 1);
        if !positive(self.old_line_number) || !positive(self.new_line_number) {
            return false;
        }
        match self.kind {
            DiffKind::Add => self.old_line_number.is_none() && self.new_line_number.is_some(),
            DiffKind::Remove => self.old_line_number.is_some() && self.new_line_number.is_none(),
            DiffKind::Unchanged => {
                self.old_line_number.is_some() && self.new_line_number.is_some()
            }
        }
    }

    /// "복사" 기능용 접두사: `+`, `-`, 공백
    pub fn prefix(&self) -> char {
        match self.kind {
            DiffKind::Add => '+',
            DiffKind::Remove => '-',
            DiffKind::Unchanged => ' ',
        }
    }
}

/// diff 결과의 집계값
///
/// `total_changes`는 항상 `additions + deletions`로 계산되며 따로 저장되지 않습니다.
/// 그래서 필드를 직접 만들지 말고 `DiffStats::new()`를 거쳐야 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub total_changes: usize,
}

impl DiffStats {
    pub fn new(additions: usize, deletions: usize) -> Self {
        Self {
            additions,
            deletions,
            total_changes: additions + deletions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffViewMode {
    #[default]
    Unified,
    Split,
}

/// 분할(side-by-side) 보기의 한 행. 비어 있는 칸은 `None`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRow {
    pub left: Option<DiffLine>,
    pub right: Option<DiffLine>,
}

/// 렌더러에 넘기는 diff 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffView {
    pub mode: DiffViewMode,
    pub stats: DiffStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<DiffLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<SplitRow>>,
    /// `+`/`-`/공백 접두사를 붙인 평문. "텍스트로 복사"에 그대로 씁니다.
    pub patch_text: String,
}

/// `POST /diff` 요청 본문
#[derive(Debug, Deserialize)]
pub struct DiffRequest {
    pub original: String,
    pub modified: String,
    #[serde(default)]
    pub mode: DiffViewMode,
    /// true면 strip_html() 전처리를 건너뜁니다 (이미 평문인 경우).
    #[serde(default)]
    pub raw: bool,
}
