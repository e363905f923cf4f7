//! # 에러 처리 모듈
//!
//! 계층별 에러 타입을 정의합니다.
//!
//! - `AppError`: HTTP 서비스 에러. `IntoResponse`로 JSON 에러 응답이 됩니다.
//! - `StoreError`: 초안 영속화 협력자(`DraftStore`) 호출 실패.
//!   자동 저장 상태 머신이 잡아서 `Error` 상태와 메시지로 바꾸며, 밖으로 던지지 않습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// HTTP 핸들러가 반환하는 에러
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면 Axum이 `IntoResponse`를 호출하여
/// `{ "error": { "code": ..., "message": ... } }` 형태의 응답으로 바꿉니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// `#[from]` 덕분에 sqlx 호출 뒤의 `?`가 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                // 내부 에러의 실제 내용은 로그에만 남기고 클라이언트에는 일반 메시지를 보냅니다.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// 초안 저장소 호출 실패
#[derive(Debug, Error)]
pub enum StoreError {
    /// 네트워크/전송 계층 실패 (연결 거부, 타임아웃, 본문 파싱 실패 등)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 서버가 에러 응답을 돌려줌
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 저장소 구현 자체의 실패 (프로세스 내 저장소 등)
    #[error("{0}")]
    Backend(String),
}
