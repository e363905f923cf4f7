//! # 챕터 및 챕터 버전 쿼리 모듈
//!
//! 챕터 본문이 바뀌면 바뀌기 직전 본문을 `chapter_versions`에 스냅샷으로 남기고,
//! 오래된 버전은 `max_versions`개만 남기고 정리합니다.
//! diff 화면은 이 버전들과 현재 본문을 비교합니다.

use crate::error::AppError;
use crate::models::{Chapter, ChapterVersion, ChapterVersionSummary};
use crate::services::text::{count_chars, count_words};
use sqlx::SqlitePool;

pub async fn create_chapter(
    pool: &SqlitePool,
    author_id: &str,
    title: &str,
    content: &str,
) -> Result<Chapter, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO chapters (id, author_id, title, content, word_count, char_count)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(author_id)
    .bind(title)
    .bind(content)
    .bind(count_words(content) as i64)
    .bind(count_chars(content) as i64)
    .execute(pool)
    .await?;

    get_chapter(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created chapter".to_string()))
}

pub async fn get_chapter(pool: &SqlitePool, id: &str) -> Result<Option<Chapter>, AppError> {
    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        SELECT id, author_id, title, content, word_count, char_count, created_at, updated_at
        FROM chapters
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(chapter)
}

/// 챕터 본문을 교체합니다.
///
/// 제목이나 본문이 실제로 바뀐 경우에만 이전 상태를 버전으로 남깁니다.
/// 작성자가 아니면 `Ok(None)` (없는 챕터와 구분하지 않음).
pub async fn update_chapter_content(
    pool: &SqlitePool,
    id: &str,
    author_id: &str,
    title: Option<&str>,
    content: &str,
    max_versions: u32,
) -> Result<Option<Chapter>, AppError> {
    let Some(chapter) = get_chapter(pool, id).await? else {
        return Ok(None);
    };
    if chapter.author_id != author_id {
        return Ok(None);
    }

    let title = title.unwrap_or(&chapter.title);
    if title == chapter.title && content == chapter.content {
        return Ok(Some(chapter));
    }

    // 트랜잭션: 스냅샷과 본문 교체는 함께 성공하거나 함께 실패해야 합니다.
    let mut tx = pool.begin().await?;

    let next_version: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(version_number), 0) + 1 FROM chapter_versions WHERE chapter_id = ?",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO chapter_versions (id, chapter_id, version_number, title, content, word_count, char_count)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(uuid::Uuid::now_v7().to_string())
    .bind(id)
    .bind(next_version)
    .bind(&chapter.title)
    .bind(&chapter.content)
    .bind(chapter.word_count)
    .bind(chapter.char_count)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE chapters
        SET title = ?, content = ?, word_count = ?, char_count = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(count_words(content) as i64)
    .bind(count_chars(content) as i64)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(chapter_id = id, version = next_version, "chapter version recorded");
    prune_versions(pool, id, max_versions).await?;

    get_chapter(pool, id).await
}

pub async fn list_versions(
    pool: &SqlitePool,
    chapter_id: &str,
) -> Result<Vec<ChapterVersionSummary>, AppError> {
    let versions = sqlx::query_as::<_, ChapterVersionSummary>(
        r#"
        SELECT id, chapter_id, version_number, title, word_count, char_count, created_at
        FROM chapter_versions
        WHERE chapter_id = ?
        ORDER BY version_number DESC
        "#,
    )
    .bind(chapter_id)
    .fetch_all(pool)
    .await?;

    Ok(versions)
}

pub async fn get_version(
    pool: &SqlitePool,
    version_id: &str,
) -> Result<Option<ChapterVersion>, AppError> {
    let version = sqlx::query_as::<_, ChapterVersion>(
        r#"
        SELECT id, chapter_id, version_number, title, content, word_count, char_count, created_at
        FROM chapter_versions
        WHERE id = ?
        "#,
    )
    .bind(version_id)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}

/// 최신 `max_versions`개만 남기고 오래된 버전을 지웁니다.
pub async fn prune_versions(
    pool: &SqlitePool,
    chapter_id: &str,
    max_versions: u32,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        DELETE FROM chapter_versions
        WHERE chapter_id = ? AND id NOT IN (
            SELECT id FROM chapter_versions
            WHERE chapter_id = ?
            ORDER BY version_number DESC
            LIMIT ?
        )
        "#,
    )
    .bind(chapter_id)
    .bind(chapter_id)
    .bind(max_versions)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn content_changes_are_snapshotted_as_versions() {
        let pool = test_pool().await;
        let chapter = create_chapter(&pool, "author", "Ch. 1", "first draft").await.unwrap();

        let updated = update_chapter_content(&pool, &chapter.id, "author", None, "second draft", 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "second draft");
        assert_eq!(updated.title, "Ch. 1");

        let versions = list_versions(&pool, &chapter.id).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version_number, 1);

        let version = get_version(&pool, &versions[0].id).await.unwrap().unwrap();
        assert_eq!(version.content, "first draft");
    }

    #[tokio::test]
    async fn identical_updates_do_not_create_versions() {
        let pool = test_pool().await;
        let chapter = create_chapter(&pool, "author", "T", "same").await.unwrap();

        update_chapter_content(&pool, &chapter.id, "author", Some("T"), "same", 10)
            .await
            .unwrap();
        assert!(list_versions(&pool, &chapter.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_the_author_can_update() {
        let pool = test_pool().await;
        let chapter = create_chapter(&pool, "author", "T", "x").await.unwrap();

        let result = update_chapter_content(&pool, &chapter.id, "someone", None, "y", 10)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(get_chapter(&pool, &chapter.id).await.unwrap().unwrap().content, "x");
    }

    #[tokio::test]
    async fn old_versions_are_pruned() {
        let pool = test_pool().await;
        let chapter = create_chapter(&pool, "author", "T", "v0").await.unwrap();
        for n in 1..=5 {
            update_chapter_content(&pool, &chapter.id, "author", None, &format!("v{n}"), 3)
                .await
                .unwrap();
        }

        let versions = list_versions(&pool, &chapter.id).await.unwrap();
        let numbers: Vec<i64> = versions.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![5, 4, 3]);
    }
}
