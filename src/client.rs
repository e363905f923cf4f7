//! # 초안 API HTTP 클라이언트
//!
//! 에디터 쪽에서 `AutoSaver`가 서버의 `/api/v1/drafts` 엔드포인트를 호출할 때 쓰는 `DraftStore` 구현입니다.
//! 사용자는 생성 시 넘긴 베어러 토큰으로 식별되므로 호출마다 사용자 ID를 넘기지 않습니다.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::StoreError,
    models::{AutoSaveToggleRequest, DraftIdResponse, DraftRecord, SaveDraftRequest},
    services::{
        autosave::{DraftStore, SaveDraft},
        recovery::DraftRecoverySummary,
    },
};

/// 서버 초안 API 클라이언트
#[derive(Debug, Clone)]
pub struct HttpDraftStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpDraftStore {
    /// * `base_url` - 서버 주소 (예: `http://127.0.0.1:3000`). 끝의 `/`는 무시합니다.
    /// * `token` - 인증 SDK가 발급한 액세스 토큰
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// 기존 [`reqwest::Client`]를 재사용합니다 (커넥션 풀 공유).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    // ---- private helpers ----

    /// 2xx가 아니면 서버의 `{"error": {"message": ...}}`를 꺼내 `Rejected`로 바꿉니다.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post_toggle(
        &self,
        path: &str,
        draft_id: Option<&str>,
        chapter_id: Option<&str>,
    ) -> Result<reqwest::Response, StoreError> {
        let body = AutoSaveToggleRequest {
            draft_id: draft_id.map(str::to_owned),
            chapter_id: chapter_id.map(str::to_owned),
        };
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(response).await
    }
}

/// 에러 본문에서 사람이 읽을 메시지를 뽑습니다. JSON이 아니면 본문을 그대로 씁니다.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_string())
}

impl DraftStore for HttpDraftStore {
    async fn save_draft_content(&self, draft: SaveDraft<'_>) -> Result<String, StoreError> {
        let body = SaveDraftRequest {
            title: draft.title.to_owned(),
            content: draft.content.to_owned(),
            draft_id: draft.draft_id.map(str::to_owned),
            chapter_id: draft.chapter_id.map(str::to_owned),
        };
        let response = self
            .client
            .put(self.url("/drafts/content"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let saved: DraftIdResponse = Self::parse_response(response).await?;
        Ok(saved.draft_id)
    }

    async fn enable_auto_save(
        &self,
        draft_id: Option<&str>,
        chapter_id: Option<&str>,
    ) -> Result<String, StoreError> {
        let response = self
            .post_toggle("/drafts/autosave/enable", draft_id, chapter_id)
            .await?;
        let enabled: DraftIdResponse = response.json().await?;
        Ok(enabled.draft_id)
    }

    async fn disable_auto_save(
        &self,
        draft_id: Option<&str>,
        chapter_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.post_toggle("/drafts/autosave/disable", draft_id, chapter_id)
            .await?;
        Ok(())
    }

    async fn list_drafts(&self) -> Result<Vec<DraftRecord>, StoreError> {
        let response = self
            .client
            .get(self.url("/drafts"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let summary: DraftRecoverySummary = Self::parse_response(response).await?;
        Ok(summary.drafts.into_iter().map(DraftRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_nested_under_api_prefix() {
        let store = HttpDraftStore::new("http://localhost:3000/", "token");
        assert_eq!(
            store.url("/drafts/content"),
            "http://localhost:3000/api/v1/drafts/content"
        );
    }

    #[test]
    fn error_message_prefers_server_message() {
        let body = r#"{"error":{"code":"not_found","message":"Resource not found"}}"#;
        assert_eq!(error_message(body), "Resource not found");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("  bad gateway \n"), "bad gateway");
    }
}
