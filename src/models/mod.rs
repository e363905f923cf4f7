//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체들을 정의합니다.
//! - `chapter`: 챕터와 챕터 버전
//! - `diff`: 라인 diff 결과, 통계, 렌더링용 뷰
//! - `draft`: 자동 저장 초안
//!
//! `pub use X::*;`로 재공개하므로 `crate::models::DiffLine`처럼 짧게 접근합니다.

pub mod chapter;
pub mod diff;
pub mod draft;

pub use chapter::*;
pub use diff::*;
pub use draft::*;
