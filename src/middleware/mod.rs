//! # 미들웨어 모듈
//!
//! - `auth`: 베어러 토큰을 검증해 `AuthUser`를 꺼내는 Extractor

pub mod auth;
