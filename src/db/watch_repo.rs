use sqlx::PgPool;
use uuid::Uuid;

use super::{VideoDocRow, VIDEO_DOC_COLUMNS};
use crate::models::VideoDoc;

/// Set-add a video into a user's watch history. Re-watching refreshes the
/// timestamp instead of adding a second entry.
pub async fn record_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = now()
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// A user's watch history, most recently watched first.
pub async fn list_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<VideoDoc>, sqlx::Error> {
    let sql = format!(
        "SELECT {VIDEO_DOC_COLUMNS} FROM watch_history wh \
         JOIN videos v ON v.id = wh.video_id \
         LEFT JOIN users u ON u.id = v.owner_id \
         WHERE wh.user_id = $1 ORDER BY wh.watched_at DESC"
    );

    let rows = sqlx::query_as::<_, VideoDocRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(VideoDocRow::into_doc).collect())
}
