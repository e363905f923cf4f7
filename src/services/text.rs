//! # 텍스트 통계 유틸리티
//!
//! 에디터 본문(리치 텍스트 마크업)에서 단어 수, 글자 수, 내용 다이제스트를 계산합니다.
//!
//! - `count_words()`: 평문 투영(`strip_html`) 기준 단어 수
//! - `count_chars()`: 원문 그대로의 문자 수
//! - `content_digest()`: 저장 생략 판단에 쓰는 SHA-256 hex

use sha2::{Digest, Sha256};

use super::diff::strip_html;

/// 본문의 단어 수를 계산합니다.
///
/// 태그를 제거한 평문을 공백(스페이스, 탭, 줄바꿈)으로 나누고 비어 있지 않은 토큰만 셉니다.
pub fn count_words(content: &str) -> usize {
    strip_html(content).split_whitespace().count()
}

/// 본문의 문자 수를 계산합니다.
///
/// 마크업을 포함한 원문 기준이며, 유니코드 문자 단위로 셉니다 (한글 1자 = 1문자).
/// `.len()`은 바이트 수이므로 쓰지 않습니다.
pub fn count_chars(content: &str) -> usize {
    content.chars().count()
}

/// 본문의 SHA-256 다이제스트(소문자 hex)
///
/// 바이트 단위로 같은 본문은 같은 값을 가지므로, "마지막 저장 이후 변경 없음"을
/// 본문 전체를 들고 있지 않고도 판단할 수 있습니다.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
