pub mod comment_repo;
pub mod like_repo;
pub mod playlist_repo;
pub mod subscription_repo;
pub mod tweet_repo;
pub mod video_repo;
pub mod views;
pub mod watch_repo;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{OwnerProfile, VideoDoc};

/// Flat row shape for owner-joined video selects. The owner columns come
/// from a LEFT JOIN and may be NULL when the channel row is gone.
#[derive(Debug, FromRow)]
pub(crate) struct VideoDocRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration_secs: f32,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_username: Option<String>,
    pub owner_full_name: Option<String>,
    pub owner_avatar_url: Option<String>,
}

impl VideoDocRow {
    pub(crate) fn into_doc(self) -> VideoDoc {
        let owner = match (self.owner_username, self.owner_full_name) {
            (Some(username), Some(full_name)) => Some(OwnerProfile {
                id: self.owner_id,
                username,
                full_name,
                avatar_url: self.owner_avatar_url,
            }),
            _ => None,
        };

        VideoDoc {
            id: self.id,
            owner_id: self.owner_id,
            video_url: self.video_url,
            thumbnail_url: self.thumbnail_url,
            title: self.title,
            description: self.description,
            duration_secs: self.duration_secs,
            views: self.views,
            is_published: self.is_published,
            created_at: self.created_at,
            owner,
        }
    }
}

/// Select list shared by every owner-joined video query.
pub(crate) const VIDEO_DOC_COLUMNS: &str = "\
    v.id, v.owner_id, v.video_url, v.thumbnail_url, v.title, v.description, \
    v.duration_secs, v.views, v.is_published, v.created_at, \
    u.username AS owner_username, u.full_name AS owner_full_name, \
    u.avatar_url AS owner_avatar_url";
