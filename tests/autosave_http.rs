//! 실제 TCP 서버를 띄우고 `AutoSaver<HttpDraftStore>`로 편집 세션을 돌려봅니다.

mod common;

use storychain::client::HttpDraftStore;
use storychain::error::StoreError;
use storychain::routes;
use storychain::services::autosave::{AutoSaveStatus, AutoSaver, DraftStore, SaveOutcome};
use storychain::services::recovery::DraftRecovery;

use common::{test_pool, test_state, token_for};

/// 임시 포트에 서버를 띄우고 주소를 돌려줍니다.
async fn spawn_server() -> String {
    let app = routes::app(test_state(test_pool().await), None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn editing_session_is_saved_and_recoverable() {
    let base_url = spawn_server().await;
    let store = HttpDraftStore::new(&base_url, token_for("novelist"));
    let mut saver = AutoSaver::new(store, Some("chapter-7".to_string()));

    saver.begin_session("Chapter 7", "<p>It was a dark night.</p>");
    assert!(saver.enable_auto_save().await);
    assert!(saver.is_enabled());
    assert_eq!(saver.state().status, AutoSaveStatus::Saved);
    let draft_id = saver.state().draft_id.clone().unwrap();

    saver.update_content("Chapter 7", "<p>It was a dark and stormy night.</p>");
    assert_eq!(saver.state().status, AutoSaveStatus::Unsaved);
    assert_eq!(saver.tick().await, SaveOutcome::Saved);
    assert_eq!(saver.tick().await, SaveOutcome::Unchanged);
    assert_eq!(saver.state().draft_id.as_deref(), Some(draft_id.as_str()));

    let records = saver.store().list_drafts().await.unwrap();
    let mut recovery = DraftRecovery::new(Some(records));
    assert!(recovery.should_prompt());
    assert!(!recovery.has_multiple_drafts());

    let latest = recovery.latest().cloned().unwrap();
    assert_eq!(latest.draft_id, draft_id);
    assert_eq!(latest.chapter_id.as_deref(), Some("chapter-7"));
    assert_eq!(latest.content, "<p>It was a dark and stormy night.</p>");
    assert_eq!(latest.word_count, 7);

    let recovered = recovery.recover_draft(&latest, |draft| draft.content.clone());
    assert_eq!(recovered, "<p>It was a dark and stormy night.</p>");
    assert!(!recovery.should_prompt());

    assert!(saver.disable_auto_save().await);
    assert!(!saver.is_enabled());
    assert_eq!(saver.state().draft_id, None);
    assert_eq!(saver.tick().await, SaveOutcome::Disabled);
}

#[tokio::test]
async fn rejected_saves_surface_as_error_state() {
    let base_url = spawn_server().await;
    let store = HttpDraftStore::new(&base_url, "not-a-valid-token");
    let mut saver = AutoSaver::new(store, None);

    saver.begin_session("Untitled", "draft text");
    assert!(!saver.enable_auto_save().await);
    assert!(!saver.is_enabled());
    assert_eq!(saver.state().status, AutoSaveStatus::Error);

    assert_eq!(saver.force_save().await, SaveOutcome::Failed);
    let message = saver.state().error.clone().unwrap();
    assert!(message.starts_with("Failed to save draft:"), "{message}");
    assert!(message.contains("401"), "{message}");
}

#[tokio::test]
async fn store_reports_server_error_message() {
    let base_url = spawn_server().await;
    let store = HttpDraftStore::new(&base_url, token_for("novelist"));

    let err = store
        .disable_auto_save(Some("no-such-draft"), None)
        .await
        .unwrap_err();
    match err {
        StoreError::Rejected { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Resource not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // 바인딩했다가 바로 닫아서 아무도 듣지 않는 포트를 얻습니다.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpDraftStore::new(format!("http://{addr}"), token_for("novelist"));
    let err = store.list_drafts().await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)), "{err}");
}
