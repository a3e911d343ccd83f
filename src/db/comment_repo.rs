use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Comment, CommentDoc, OwnerProfile};

#[derive(Debug, FromRow)]
struct CommentDocRow {
    id: Uuid,
    video_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_username: Option<String>,
    owner_full_name: Option<String>,
    owner_avatar_url: Option<String>,
    likes_count: i64,
    is_liked: bool,
}

impl CommentDocRow {
    fn into_doc(self) -> CommentDoc {
        let owner = match (self.owner_username, self.owner_full_name) {
            (Some(username), Some(full_name)) => Some(OwnerProfile {
                id: self.owner_id,
                username,
                full_name,
                avatar_url: self.owner_avatar_url,
            }),
            _ => None,
        };

        CommentDoc {
            id: self.id,
            video_id: self.video_id,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
            owner,
            likes_count: self.likes_count,
            is_liked: self.is_liked,
        }
    }
}

pub async fn create_comment(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (video_id, owner_id, content)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(video_id)
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn get_comment(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $2, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(comment_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Newest-first comment page for a video, enriched with the owner profile
/// and like context for the viewer. Anonymous viewers see `is_liked` false.
pub async fn list_for_video(
    pool: &PgPool,
    video_id: Uuid,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<CommentDoc>, i64), sqlx::Error> {
    let rows = sqlx::query_as::<_, CommentDocRow>(
        r#"
        SELECT c.id, c.video_id, c.content, c.created_at, c.updated_at,
               c.owner_id,
               u.username AS owner_username,
               u.full_name AS owner_full_name,
               u.avatar_url AS owner_avatar_url,
               (SELECT COUNT(*) FROM likes l WHERE l.comment_id = c.id) AS likes_count,
               EXISTS(
                   SELECT 1 FROM likes l
                   WHERE l.comment_id = c.id AND l.liked_by = $2::uuid
               ) AS is_liked
        FROM comments c
        LEFT JOIN users u ON u.id = c.owner_id
        WHERE c.video_id = $1
        ORDER BY c.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(video_id)
    .bind(viewer)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(pool)
        .await?;

    Ok((rows.into_iter().map(CommentDocRow::into_doc).collect(), total))
}
