use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{OwnerProfile, Tweet, TweetDoc};

#[derive(Debug, FromRow)]
struct TweetDocRow {
    id: Uuid,
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

impl TweetDocRow {
    fn into_doc(self) -> TweetDoc {
        let owner = match (self.owner_username, self.owner_full_name) {
            (Some(username), Some(full_name)) => Some(OwnerProfile {
                id: self.owner_id,
                username,
                full_name,
                avatar_url: self.owner_avatar_url,
            }),
            _ => None,
        };

        TweetDoc {
            id: self.id,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
            owner,
            likes_count: self.likes_count,
            is_liked: self.is_liked,
        }
    }
}

pub async fn create_tweet(
    pool: &PgPool,
    owner_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(
        r#"
        INSERT INTO tweets (owner_id, content)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn get_tweet(pool: &PgPool, tweet_id: Uuid) -> Result<Option<Tweet>, sqlx::Error> {
    sqlx::query_as::<_, Tweet>("SELECT * FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .fetch_optional(pool)
        .await
}

pub async fn update_tweet(
    pool: &PgPool,
    tweet_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    sqlx::query_as::<_, Tweet>(
        r#"
        UPDATE tweets
        SET content = $2, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(tweet_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn delete_tweet(pool: &PgPool, tweet_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// A user's tweets newest first, with owner profile and like context for
/// the viewer.
pub async fn list_user_tweets(
    pool: &PgPool,
    owner_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Vec<TweetDoc>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TweetDocRow>(
        r#"
        SELECT t.id, t.content, t.created_at, t.updated_at,
               t.owner_id,
               u.username AS owner_username,
               u.full_name AS owner_full_name,
               u.avatar_url AS owner_avatar_url,
               (SELECT COUNT(*) FROM likes l WHERE l.tweet_id = t.id) AS likes_count,
               EXISTS(
                   SELECT 1 FROM likes l
                   WHERE l.tweet_id = t.id AND l.liked_by = $2::uuid
               ) AS is_liked
        FROM tweets t
        LEFT JOIN users u ON u.id = t.owner_id
        WHERE t.owner_id = $1
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(owner_id)
    .bind(viewer)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(TweetDocRow::into_doc).collect())
}

pub async fn tweet_exists(pool: &PgPool, tweet_id: Uuid) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM tweets WHERE id = $1)",
    )
    .bind(tweet_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
