//! # StoryChain 백엔드
//!
//! 챕터 버전 비교를 위한 라인 diff 엔진, 에디터 자동 저장 상태 머신,
//! 초안 복구 판단, 그리고 이들을 뒷받침하는 HTTP 영속화 API를 제공합니다.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
