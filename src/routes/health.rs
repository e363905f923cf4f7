//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok", "version": "...", "db_healthy": true }`
//!
//! 인증 없이 호출할 수 있습니다. 로드밸런서와 컨테이너 헬스체크용입니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::routes::AppState;

/// `GET /health`: 서버와 DB 연결 상태를 확인합니다.
///
/// DB 쿼리가 실패해도 200을 돌려주고 `db_healthy: false`로 알립니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_healthy = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();

    if !db_healthy {
        tracing::warn!("health check: database is unreachable");
    }

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy
    }))
}
