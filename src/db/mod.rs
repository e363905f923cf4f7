//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! SQLite와 직접 상호작용하는 함수들입니다. 라우트 핸들러(routes/)가 호출합니다.
//!
//! - `chapters`: 챕터 CRUD와 버전 스냅샷/정리
//! - `drafts`: 자동 저장 초안의 저장, 켜기/끄기, 목록, 삭제

pub mod chapters;
pub mod drafts;

pub use chapters::*;
pub use drafts::*;

/// 마이그레이션을 적용한 인메모리 DB (테스트 전용)
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 되므로 연결을 하나로 고정합니다.
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}
