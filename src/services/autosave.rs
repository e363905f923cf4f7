//! # 자동 저장 상태 머신
//!
//! 편집 중인 챕터를 주기적으로 초안 저장소에 저장하고, 저장 상태를 UI에 노출합니다.
//!
//! ## 상태 전이
//! ```text
//!            update_content (저장본과 다름)
//!   Idle ──────────────────────────────────▶ Unsaved
//!    │                                         │
//!    │ tick / force_save (내용이 바뀐 경우)       │
//!    ▼                                         ▼
//!  Saving ──성공──▶ Saved ──내용 변경──▶ Unsaved ──tick──▶ Saving
//!    │
//!    └──실패──▶ Error ──다음 tick / force_save──▶ Saving
//! ```
//!
//! - 편집 세션(`begin_session`)이 없으면 모든 저장 시도는 아무 일도 하지 않습니다.
//! - 마지막으로 저장에 성공한 스냅샷과 바이트 단위로 같으면 저장을 건너뜁니다 (`Saving`을 거치지 않음).
//! - 저장 실패는 `Error` 상태와 메시지로 바뀔 뿐 밖으로 던지지 않으며, 타이머는 계속 돕니다.
//!
//! `AutoSaver`는 `&mut self`로만 저장하므로 한 세션의 저장은 절대 겹치지 않습니다.
//! 타이머는 `AutoSaveSession`이 관리합니다.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::StoreError;
use crate::models::DraftRecord;

use super::recovery::DraftData;
use super::text::content_digest;

/// 자동 저장 주기 기본값
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoSaveStatus {
    /// 아직 저장을 시도한 적 없음
    Idle,
    /// 저장 요청이 진행 중
    Saving,
    /// 마지막 저장 성공
    Saved,
    /// 마지막 저장 이후 내용이 바뀜
    Unsaved,
    /// 마지막 저장 시도 실패
    Error,
}

/// UI가 관찰하는 자동 저장 상태 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoSaveState {
    pub status: AutoSaveStatus,
    pub enabled: bool,
    pub draft_id: Option<String>,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Default for AutoSaveState {
    fn default() -> Self {
        Self {
            status: AutoSaveStatus::Idle,
            enabled: false,
            draft_id: None,
            last_saved_at: None,
            error: None,
        }
    }
}

/// 저장 한 번의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// 마지막 저장본과 같아서 건너뜀
    Unchanged,
    /// 편집 세션이 없어 건너뜀
    NoSession,
    /// 자동 저장이 꺼져 있어 주기 저장을 건너뜀
    Disabled,
    Failed,
}

/// `save_draft_content` 인자
#[derive(Debug, Clone, Copy)]
pub struct SaveDraft<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub draft_id: Option<&'a str>,
    pub chapter_id: Option<&'a str>,
}

/// 초안 영속화 협력자
///
/// 사용자는 저장소 인스턴스에 묶여 있습니다 (예: `HttpDraftStore`의 베어러 토큰).
pub trait DraftStore: Send + Sync {
    /// 초안 본문을 저장하고 초안 ID를 돌려줍니다. `draft_id`가 없으면 새 초안이 만들어집니다.
    fn save_draft_content(
        &self,
        draft: SaveDraft<'_>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// 자동 저장을 켜고, 이후 저장의 기준이 되는 초안 ID를 돌려줍니다.
    fn enable_auto_save(
        &self,
        draft_id: Option<&str>,
        chapter_id: Option<&str>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// 자동 저장을 끕니다. 초안은 삭제하지 않습니다.
    fn disable_auto_save(
        &self,
        draft_id: Option<&str>,
        chapter_id: Option<&str>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_drafts(&self) -> impl Future<Output = Result<Vec<DraftRecord>, StoreError>> + Send;
}

#[derive(Debug, Clone)]
struct EditorSnapshot {
    title: String,
    content: String,
}

impl EditorSnapshot {
    /// 제목과 본문을 `\0`으로 이어 붙인 다이제스트. 제목만 바뀌어도 값이 달라집니다.
    fn digest(&self) -> String {
        content_digest(&format!("{}\0{}", self.title, self.content))
    }
}

pub struct AutoSaver<S> {
    store: S,
    chapter_id: Option<String>,
    session: Option<EditorSnapshot>,
    /// 세션 시작 시점의 다이제스트. 아직 저장한 적이 없을 때 Unsaved 판단 기준
    baseline_digest: Option<String>,
    last_saved_digest: Option<String>,
    state: AutoSaveState,
    updates: watch::Sender<AutoSaveState>,
}

impl<S: DraftStore> AutoSaver<S> {
    pub fn new(store: S, chapter_id: Option<String>) -> Self {
        let (updates, _) = watch::channel(AutoSaveState::default());
        Self {
            store,
            chapter_id,
            session: None,
            baseline_digest: None,
            last_saved_digest: None,
            state: AutoSaveState::default(),
            updates,
        }
    }

    pub fn state(&self) -> &AutoSaveState {
        &self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<AutoSaveState> {
        self.updates.subscribe()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }

    fn set_status(&mut self, status: AutoSaveStatus) {
        if self.state.status != status {
            tracing::debug!(from = ?self.state.status, to = ?status, "auto-save status");
            self.state.status = status;
        }
    }

    /// 에디터를 붙입니다. 이 시점의 내용이 "변경 없음"의 기준이 됩니다.
    pub fn begin_session(&mut self, title: impl Into<String>, content: impl Into<String>) {
        let snapshot = EditorSnapshot {
            title: title.into(),
            content: content.into(),
        };
        self.baseline_digest = Some(snapshot.digest());
        self.session = Some(snapshot);
        self.refresh_dirty_status();
        self.publish();
    }

    /// 에디터를 뗍니다. 이후 저장 시도는 `NoSession`으로 끝납니다.
    ///
    /// 상태는 `Idle`로 돌아가고, 자동 저장 켜짐 여부와 초안 ID는 유지됩니다.
    pub fn end_session(&mut self) {
        self.session = None;
        self.baseline_digest = None;
        self.set_status(AutoSaveStatus::Idle);
        self.publish();
    }

    /// 에디터의 최신 제목/본문을 기록합니다.
    ///
    /// 세션이 없으면 무시합니다. 저장은 하지 않고 상태만 `Unsaved`로 바꿉니다.
    pub fn update_content(&mut self, title: impl Into<String>, content: impl Into<String>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.title = title.into();
        session.content = content.into();
        self.refresh_dirty_status();
        self.publish();
    }

    fn refresh_dirty_status(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let current = session.digest();
        let reference = self
            .last_saved_digest
            .as_deref()
            .or(self.baseline_digest.as_deref());

        if reference != Some(current.as_str()) {
            self.set_status(AutoSaveStatus::Unsaved);
        } else if self.state.status == AutoSaveStatus::Unsaved {
            let settled = if self.last_saved_digest.is_some() {
                AutoSaveStatus::Saved
            } else {
                AutoSaveStatus::Idle
            };
            self.set_status(settled);
        }
    }

    /// 복구한 초안을 저장된 기준점으로 삼고 편집을 이어갑니다.
    pub fn restore_draft(&mut self, draft: &DraftData) {
        let snapshot = EditorSnapshot {
            title: draft.title.clone(),
            content: draft.content.clone(),
        };
        let digest = snapshot.digest();

        self.session = Some(snapshot);
        self.baseline_digest = Some(digest.clone());
        self.last_saved_digest = Some(digest);
        if draft.chapter_id.is_some() {
            self.chapter_id = draft.chapter_id.clone();
        }
        self.state.draft_id = Some(draft.draft_id.clone());
        self.state.last_saved_at = Some(draft.last_saved_at);
        self.state.error = None;
        self.set_status(AutoSaveStatus::Saved);
        self.publish();
    }

    /// 자동 저장을 켭니다.
    ///
    /// 성공하면 저장소가 돌려준 초안 ID를 기준으로 삼고 곧바로 한 번 저장합니다.
    /// 실패하면 `Error` 상태가 되고 자동 저장은 꺼진 채로 남습니다.
    /// 이미 켜져 있으면 저장소를 다시 부르지 않습니다.
    pub async fn enable_auto_save(&mut self) -> bool {
        if self.state.enabled {
            return true;
        }

        let result = self
            .store
            .enable_auto_save(self.state.draft_id.as_deref(), self.chapter_id.as_deref())
            .await;

        match result {
            Ok(draft_id) => {
                tracing::info!(%draft_id, "auto-save enabled");
                if self.state.draft_id.as_deref() != Some(draft_id.as_str()) {
                    // 새 초안에는 아직 아무 내용도 저장되지 않았습니다.
                    self.last_saved_digest = None;
                }
                self.state.draft_id = Some(draft_id);
                self.state.enabled = true;
                self.publish();
                self.perform_save().await;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to enable auto-save");
                self.state.error = Some(format!("Failed to enable auto-save: {}", e));
                self.set_status(AutoSaveStatus::Error);
                self.publish();
                false
            }
        }
    }

    /// 자동 저장을 끕니다.
    ///
    /// 성공하면 초안 ID를 놓아서 다음 enable 때 새 초안이 발급되게 합니다.
    /// 마지막 저장 다이제스트는 남겨 두므로, 끈 뒤의 수동 저장도 같은 내용이면 건너뜁니다.
    /// 실패하면 `Error` 상태가 되고 켜짐 상태는 그대로 유지합니다.
    pub async fn disable_auto_save(&mut self) -> bool {
        if !self.state.enabled {
            return true;
        }

        let result = self
            .store
            .disable_auto_save(self.state.draft_id.as_deref(), self.chapter_id.as_deref())
            .await;

        match result {
            Ok(()) => {
                tracing::info!(draft_id = ?self.state.draft_id, "auto-save disabled");
                self.state.enabled = false;
                self.state.draft_id = None;
                self.publish();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to disable auto-save");
                self.state.error = Some(format!("Failed to disable auto-save: {}", e));
                self.set_status(AutoSaveStatus::Error);
                self.publish();
                false
            }
        }
    }

    /// 주기 저장. 자동 저장이 꺼져 있으면 아무 일도 하지 않습니다.
    pub async fn tick(&mut self) -> SaveOutcome {
        if !self.state.enabled {
            return SaveOutcome::Disabled;
        }
        self.perform_save().await
    }

    /// 수동 저장 ("지금 저장", 단축키). 자동 저장이 꺼져 있어도 동작합니다.
    pub async fn force_save(&mut self) -> SaveOutcome {
        self.perform_save().await
    }

    async fn perform_save(&mut self) -> SaveOutcome {
        let Some(snapshot) = self.session.clone() else {
            return SaveOutcome::NoSession;
        };
        let digest = snapshot.digest();
        if self.last_saved_digest.as_deref() == Some(digest.as_str()) {
            return SaveOutcome::Unchanged;
        }

        self.set_status(AutoSaveStatus::Saving);
        self.publish();

        let request = SaveDraft {
            title: &snapshot.title,
            content: &snapshot.content,
            draft_id: self.state.draft_id.as_deref(),
            chapter_id: self.chapter_id.as_deref(),
        };
        let result = self.store.save_draft_content(request).await;

        let outcome = match result {
            Ok(draft_id) => {
                self.state.draft_id = Some(draft_id);
                self.state.last_saved_at = Some(Utc::now());
                self.state.error = None;
                self.last_saved_digest = Some(digest);
                self.set_status(AutoSaveStatus::Saved);
                SaveOutcome::Saved
            }
            Err(e) => {
                tracing::warn!(error = %e, draft_id = ?self.state.draft_id, "draft save failed");
                self.state.error = Some(format!("Failed to save draft: {}", e));
                self.set_status(AutoSaveStatus::Error);
                SaveOutcome::Failed
            }
        };
        self.publish();
        outcome
    }
}

/// `AutoSaver`와 주기 타이머를 함께 관리하는 편집 세션 핸들
///
/// 타이머 태스크는 `try_lock`으로 저장기를 잡습니다. 수동 저장이 진행 중이면 그 틱은 건너뛰므로
/// 틱끼리, 혹은 틱과 수동 저장이 겹치지 않습니다.
pub struct AutoSaveSession<S> {
    saver: Arc<Mutex<AutoSaver<S>>>,
    state: watch::Receiver<AutoSaveState>,
    interval: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl<S: DraftStore + 'static> AutoSaveSession<S> {
    pub fn new(saver: AutoSaver<S>) -> Self {
        Self::with_interval(saver, DEFAULT_AUTOSAVE_INTERVAL)
    }

    pub fn with_interval(saver: AutoSaver<S>, interval: Duration) -> Self {
        let state = saver.subscribe();
        Self {
            saver: Arc::new(Mutex::new(saver)),
            state,
            interval,
            ticker: None,
        }
    }

    pub fn state(&self) -> AutoSaveState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AutoSaveState> {
        self.state.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub async fn begin_session(&self, title: impl Into<String>, content: impl Into<String>) {
        self.saver.lock().await.begin_session(title, content);
    }

    pub async fn update_content(&self, title: impl Into<String>, content: impl Into<String>) {
        self.saver.lock().await.update_content(title, content);
    }

    pub async fn end_session(&self) {
        self.saver.lock().await.end_session();
    }

    pub async fn restore_draft(&self, draft: &DraftData) {
        self.saver.lock().await.restore_draft(draft);
    }

    pub async fn force_save(&self) -> SaveOutcome {
        self.saver.lock().await.force_save().await
    }

    /// 자동 저장을 켜고, 성공하면 타이머를 (한 번만) 시작합니다.
    pub async fn enable_auto_save(&mut self) -> bool {
        let mut saver = self.saver.lock().await;
        let enabled = saver.enable_auto_save().await;
        if enabled && !self.is_ticking() {
            self.ticker = Some(spawn_ticker(Arc::clone(&self.saver), self.interval));
        }
        enabled
    }

    /// 자동 저장을 끄고, 성공하면 타이머를 멈춥니다.
    ///
    /// 저장기 락을 쥔 채로 타이머를 중단하므로 이미 나간 저장 요청이 중간에 취소되지 않습니다.
    pub async fn disable_auto_save(&mut self) -> bool {
        let mut saver = self.saver.lock().await;
        let disabled = saver.disable_auto_save().await;
        if disabled {
            if let Some(ticker) = self.ticker.take() {
                ticker.abort();
            }
        }
        disabled
    }
}

impl<S> Drop for AutoSaveSession<S> {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

fn spawn_ticker<S: DraftStore + 'static>(
    saver: Arc<Mutex<AutoSaver<S>>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let Ok(mut saver) = saver.try_lock() else {
                tracing::debug!("save already in progress, skipping auto-save tick");
                continue;
            };
            let outcome = saver.tick().await;
            tracing::trace!(?outcome, "auto-save tick");
        }
    })
}
