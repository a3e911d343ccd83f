//! Derived-view composition layer.
//!
//! Read-side documents are composed at request time from the live tables:
//! like counts, viewer-specific flags and subscriber counts are joined onto
//! the stored entities in a single query (or a fixed set of parallel
//! aggregates). Nothing here is cached or materialized, so every response
//! reflects the store as of the read.
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::VideoDoc;

/// Owner block of the video detail document: public profile plus the
/// channel's subscriber context for the requesting viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCard {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub subscribers_count: i64,
    pub is_subscribed: bool,
}

/// Single-video detail document. `is_liked` and `is_subscribed` are false
/// for anonymous viewers; `views` is the count before this read's bump.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub id: Uuid,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    pub title: String,
    pub description: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_secs: f32,
    /// Absent when the owning channel row has disappeared; the video
    /// itself still renders.
    pub owner: Option<ChannelCard>,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// One element of the liked-videos listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideoEntry {
    pub liked_video: VideoDoc,
}

/// Channel-wide aggregates for the dashboard. Every field is zero for a
/// channel with no activity.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_videos: i64,
    pub total_likes: i64,
}

#[derive(Debug, FromRow)]
struct VideoDetailRow {
    id: Uuid,
    video_url: String,
    title: String,
    description: String,
    views: i64,
    created_at: DateTime<Utc>,
    duration_secs: f32,
    owner_id: Option<Uuid>,
    owner_username: Option<String>,
    owner_full_name: Option<String>,
    owner_avatar_url: Option<String>,
    likes_count: i64,
    is_liked: bool,
    subscribers_count: i64,
    is_subscribed: bool,
}

impl VideoDetailRow {
    fn into_detail(self) -> VideoDetail {
        let owner = match (self.owner_id, self.owner_username, self.owner_full_name) {
            (Some(id), Some(username), Some(full_name)) => Some(ChannelCard {
                id,
                username,
                full_name,
                avatar_url: self.owner_avatar_url,
                subscribers_count: self.subscribers_count,
                is_subscribed: self.is_subscribed,
            }),
            _ => None,
        };

        VideoDetail {
            id: self.id,
            video_url: self.video_url,
            title: self.title,
            description: self.description,
            views: self.views,
            created_at: self.created_at,
            duration_secs: self.duration_secs,
            owner,
            likes_count: self.likes_count,
            is_liked: self.is_liked,
        }
    }
}

/// Compose the single-video detail document: the video row enriched with
/// its like context, its owner profile and the owner's subscription context
/// for `viewer`. Returns `None` when the video does not exist. The view
/// bump and watch-history side effects belong to the caller.
pub async fn video_detail(
    pool: &PgPool,
    video_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<VideoDetail>, sqlx::Error> {
    let row = sqlx::query_as::<_, VideoDetailRow>(
        r#"
        SELECT v.id, v.video_url, v.title, v.description, v.views, v.created_at,
               v.duration_secs,
               u.id AS owner_id,
               u.username AS owner_username,
               u.full_name AS owner_full_name,
               u.avatar_url AS owner_avatar_url,
               (SELECT COUNT(*) FROM likes l WHERE l.video_id = v.id) AS likes_count,
               EXISTS(
                   SELECT 1 FROM likes l
                   WHERE l.video_id = v.id AND l.liked_by = $2::uuid
               ) AS is_liked,
               (SELECT COUNT(*) FROM subscriptions s
                WHERE s.channel_id = v.owner_id) AS subscribers_count,
               EXISTS(
                   SELECT 1 FROM subscriptions s
                   WHERE s.channel_id = v.owner_id AND s.subscriber_id = $2::uuid
               ) AS is_subscribed
        FROM videos v
        LEFT JOIN users u ON u.id = v.owner_id
        WHERE v.id = $1
        "#,
    )
    .bind(video_id)
    .bind(viewer)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(VideoDetailRow::into_detail))
}

/// Videos the user has liked, most recently liked first. Likes whose video
/// is gone drop out of the join.
pub async fn liked_videos(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<LikedVideoEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, super::VideoDocRow>(
        r#"
        SELECT v.id, v.owner_id, v.video_url, v.thumbnail_url, v.title, v.description,
               v.duration_secs, v.views, v.is_published, v.created_at,
               u.username AS owner_username,
               u.full_name AS owner_full_name,
               u.avatar_url AS owner_avatar_url
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        LEFT JOIN users u ON u.id = v.owner_id
        WHERE l.liked_by = $1 AND l.video_id IS NOT NULL
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| LikedVideoEntry {
            liked_video: row.into_doc(),
        })
        .collect())
}

/// Channel statistics: four independent aggregates run in parallel.
/// `total_likes` counts likes on the channel's videos (likes joined to
/// videos, filtered by owner).
pub async fn channel_stats(pool: &PgPool, channel_id: Uuid) -> Result<ChannelStats, sqlx::Error> {
    let total_views = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(views), 0)::BIGINT FROM videos WHERE owner_id = $1",
    )
    .bind(channel_id)
    .fetch_one(pool);

    let total_subscribers =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
            .bind(channel_id)
            .fetch_one(pool);

    let total_videos =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos WHERE owner_id = $1")
            .bind(channel_id)
            .fetch_one(pool);

    let total_likes = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        WHERE v.owner_id = $1
        "#,
    )
    .bind(channel_id)
    .fetch_one(pool);

    let (total_views, total_subscribers, total_videos, total_likes) =
        tokio::try_join!(total_views, total_subscribers, total_videos, total_likes)?;

    Ok(ChannelStats {
        total_views,
        total_subscribers,
        total_videos,
        total_likes,
    })
}
