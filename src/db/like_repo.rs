//! Like toggles. Each toggle is a single atomic upsert against the partial
//! unique index for its subject column: an insert that lands means the like
//! turned on, a conflict means it was already on and gets deleted instead.
use sqlx::PgPool;
use uuid::Uuid;

/// Toggle a like on a video. Returns the resulting state: true when the
/// like is now present.
pub async fn toggle_video_like(
    pool: &PgPool,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO likes (video_id, liked_by)
        VALUES ($1, $2)
        ON CONFLICT (video_id, liked_by) WHERE video_id IS NOT NULL DO NOTHING
        RETURNING id
        "#,
    )
    .bind(video_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if inserted.is_some() {
        return Ok(true);
    }

    sqlx::query("DELETE FROM likes WHERE video_id = $1 AND liked_by = $2")
        .bind(video_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(false)
}

/// Toggle a like on a comment.
pub async fn toggle_comment_like(
    pool: &PgPool,
    comment_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO likes (comment_id, liked_by)
        VALUES ($1, $2)
        ON CONFLICT (comment_id, liked_by) WHERE comment_id IS NOT NULL DO NOTHING
        RETURNING id
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if inserted.is_some() {
        return Ok(true);
    }

    sqlx::query("DELETE FROM likes WHERE comment_id = $1 AND liked_by = $2")
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(false)
}

/// Toggle a like on a tweet.
pub async fn toggle_tweet_like(
    pool: &PgPool,
    tweet_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO likes (tweet_id, liked_by)
        VALUES ($1, $2)
        ON CONFLICT (tweet_id, liked_by) WHERE tweet_id IS NOT NULL DO NOTHING
        RETURNING id
        "#,
    )
    .bind(tweet_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if inserted.is_some() {
        return Ok(true);
    }

    sqlx::query("DELETE FROM likes WHERE tweet_id = $1 AND liked_by = $2")
        .bind(tweet_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(false)
}
