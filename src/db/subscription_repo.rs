use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::OwnerProfile;

/// Toggle a subscription. Returns the resulting state: true when the
/// subscription is now present. Same atomic upsert shape as the like
/// toggles; `uq_subscriptions_pair` is the backstop.
pub async fn toggle(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO subscriptions (subscriber_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT (subscriber_id, channel_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    if inserted.is_some() {
        return Ok(true);
    }

    sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(pool)
        .await?;

    Ok(false)
}

pub async fn channel_exists(pool: &PgPool, channel_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(channel_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<bool, _>(0))
}

/// Profiles of the users subscribed to a channel, newest first.
pub async fn list_subscribers(
    pool: &PgPool,
    channel_id: Uuid,
) -> Result<Vec<OwnerProfile>, sqlx::Error> {
    sqlx::query_as::<_, OwnerProfile>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await
}

/// Profiles of the channels a user subscribes to, newest first.
pub async fn list_subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Vec<OwnerProfile>, sqlx::Error> {
    sqlx::query_as::<_, OwnerProfile>(
        r#"
        SELECT u.id, u.username, u.full_name, u.avatar_url
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(subscriber_id)
    .fetch_all(pool)
    .await
}
