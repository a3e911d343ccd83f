use sqlx::PgPool;
use uuid::Uuid;

use super::{VideoDocRow, VIDEO_DOC_COLUMNS};
use crate::models::{Playlist, PlaylistDoc, VideoDoc};

pub async fn create_playlist(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Playlist, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"
        INSERT INTO playlists (owner_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn get_playlist(
    pool: &PgPool,
    playlist_id: Uuid,
) -> Result<Option<Playlist>, sqlx::Error> {
    sqlx::query_as::<_, Playlist>("SELECT * FROM playlists WHERE id = $1")
        .bind(playlist_id)
        .fetch_optional(pool)
        .await
}

/// Rename and/or redescribe; absent fields keep their value.
pub async fn update_playlist(
    pool: &PgPool,
    playlist_id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Playlist, sqlx::Error> {
    sqlx::query_as::<_, Playlist>(
        r#"
        UPDATE playlists
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(playlist_id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn delete_playlist(pool: &PgPool, playlist_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
        .bind(playlist_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// A user's playlists with their membership counts, newest first.
pub async fn list_user_playlists(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<PlaylistDoc>, sqlx::Error> {
    sqlx::query_as::<_, PlaylistDoc>(
        r#"
        SELECT p.id, p.owner_id, p.name, p.description, p.created_at, p.updated_at,
               (SELECT COUNT(*) FROM playlist_videos pv WHERE pv.playlist_id = p.id)
                   AS videos_count
        FROM playlists p
        WHERE p.owner_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Videos of a playlist in playlist order. Duplicate entries appear once
/// per membership row.
pub async fn playlist_videos(
    pool: &PgPool,
    playlist_id: Uuid,
) -> Result<Vec<VideoDoc>, sqlx::Error> {
    let sql = format!(
        "SELECT {VIDEO_DOC_COLUMNS} FROM playlist_videos pv \
         JOIN videos v ON v.id = pv.video_id \
         LEFT JOIN users u ON u.id = v.owner_id \
         WHERE pv.playlist_id = $1 ORDER BY pv.id"
    );

    let rows = sqlx::query_as::<_, VideoDocRow>(&sql)
        .bind(playlist_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(VideoDocRow::into_doc).collect())
}

/// Append a video. Duplicates are allowed; each call adds another entry.
pub async fn add_video(
    pool: &PgPool,
    playlist_id: Uuid,
    video_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO playlist_videos (playlist_id, video_id) VALUES ($1, $2)")
        .bind(playlist_id)
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove every occurrence of a video from a playlist. Returns the number
/// of entries removed.
pub async fn remove_video(
    pool: &PgPool,
    playlist_id: Uuid,
    video_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
            .bind(playlist_id)
            .bind(video_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}
