use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::{video_repo, views};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::response::ApiResponse;

/// Channel-wide statistics for the authenticated channel. A channel with
/// no activity gets all zeros, never an error.
pub async fn get_channel_stats(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let stats = views::channel_stats(&pool, user_id.0).await?;

    Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

/// Every video of the authenticated channel, drafts included, newest
/// first. No videos is reported as not-found.
pub async fn get_channel_videos(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let videos = video_repo::list_channel_videos(&pool, user_id.0).await?;

    if videos.is_empty() {
        return Err(AppError::NotFound(
            "No videos found for this channel".to_string(),
        ));
    }

    Ok(ApiResponse::ok(videos, "Channel videos fetched successfully"))
}
