//! # 비즈니스 로직 서비스
//!
//! HTTP나 DB에 묶이지 않는 순수 로직입니다.
//!
//! - `diff`: LCS 라인 diff, 통계, 패치 텍스트, 분할 보기
//! - `autosave`: 자동 저장 상태 머신과 주기 저장 세션
//! - `recovery`: 초안 복구 판단
//! - `text`: 단어/문자 수, 본문 해시

pub mod autosave;
pub mod diff;
pub mod recovery;
pub mod text;
