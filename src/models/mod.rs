use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Channel identity. Account issuance lives outside this service; user rows
/// are provisioned by the identity provider before we ever see their ids.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video row. Wire names follow the client contract: the playable URL is
/// `videoFile`, the storage keys never leave the service.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    #[serde(skip_serializing)]
    pub video_key: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    #[serde(skip_serializing)]
    pub thumbnail_key: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "duration")]
    pub duration_secs: f32,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public owner projection attached to videos, comments and tweets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// Video document enriched with its owner profile, as served by catalog,
/// playlist, history and dashboard listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDoc {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "duration")]
    pub duration_secs: f32,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    /// Absent when the owning channel row has disappeared.
    pub owner: Option<OwnerProfile>,
}

/// Comment document with social context for the requesting viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDoc {
    pub id: Uuid,
    pub video_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: Option<OwnerProfile>,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// Tweet document with social context for the requesting viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetDoc {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: Option<OwnerProfile>,
    pub likes_count: i64,
    pub is_liked: bool,
}

/// Playlist summary with its membership count.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDoc {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub videos_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Playlist with its videos in playlist order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub videos: Vec<VideoDoc>,
}
