//! # Diff 라우트 핸들러
//!
//! - `POST /api/v1/diff` → 두 텍스트의 라인 diff
//!
//! 챕터 버전 비교(`GET /chapters/{id}/diff`)도 여기의 `render_diff()`를 거칩니다.

use axum::{extract::State, Json};

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::{DiffRequest, DiffView, DiffViewMode},
    routes::AppState,
    services::diff::{build_view, lcs_table_cells, line_count, strip_html},
};

/// 전처리와 크기 제한을 거쳐 diff 뷰를 만듭니다.
///
/// LCS 테이블은 O(m·n) 메모리를 쓰므로 한쪽 줄 수나 테이블 칸 수가 설정을 넘는 입력은
/// 잘라내지 않고 400으로 거절합니다. 계산은 블로킹 스레드에서 돌려 런타임 워커를 붙잡지 않습니다.
pub(crate) async fn render_diff(
    state: &AppState,
    original: &str,
    modified: &str,
    mode: DiffViewMode,
    raw: bool,
) -> Result<DiffView, AppError> {
    let (original, modified) = if raw {
        (original.to_string(), modified.to_string())
    } else {
        (strip_html(original), strip_html(modified))
    };

    let longest = line_count(&original).max(line_count(&modified));
    if longest > state.max_diff_lines {
        return Err(AppError::BadRequest(format!(
            "diff input has {} lines, the limit is {}",
            longest, state.max_diff_lines
        )));
    }

    let cells = lcs_table_cells(&original, &modified);
    if cells > state.max_diff_cells {
        return Err(AppError::BadRequest(format!(
            "diff inputs need {} comparison cells, the limit is {}",
            cells, state.max_diff_cells
        )));
    }

    tokio::task::spawn_blocking(move || build_view(&original, &modified, mode))
        .await
        .map_err(|e| AppError::Internal(format!("diff task failed: {}", e)))
}

/// `POST /diff`
///
/// ```text
/// { "original": "<p>a</p>", "modified": "<p>b</p>", "mode": "split" }
/// ```
pub async fn diff_texts(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Json(req): Json<DiffRequest>,
) -> Result<Json<DiffView>, AppError> {
    let view = render_diff(&state, &req.original, &req.modified, req.mode, req.raw).await?;
    Ok(Json(view))
}
