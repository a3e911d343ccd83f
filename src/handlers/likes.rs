use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, like_repo, tweet_repo, video_repo, views};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::response::ApiResponse;

/// Toggle the caller's like on a video. The response reports the state the
/// store reached.
pub async fn toggle_video_like(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    if !video_repo::video_exists(&pool, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let liked = like_repo::toggle_video_like(&pool, video_id, user_id.0).await?;

    Ok(ApiResponse::ok(
        json!({ "liked": liked }),
        if liked { "Video liked" } else { "Video unliked" },
    ))
}

pub async fn toggle_comment_like(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();

    if comment_repo::get_comment(&pool, comment_id).await?.is_none() {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    let liked = like_repo::toggle_comment_like(&pool, comment_id, user_id.0).await?;

    Ok(ApiResponse::ok(
        json!({ "liked": liked }),
        if liked { "Comment liked" } else { "Comment unliked" },
    ))
}

pub async fn toggle_tweet_like(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = path.into_inner();

    if !tweet_repo::tweet_exists(&pool, tweet_id).await? {
        return Err(AppError::NotFound("Tweet not found".to_string()));
    }

    let liked = like_repo::toggle_tweet_like(&pool, tweet_id, user_id.0).await?;

    Ok(ApiResponse::ok(
        json!({ "liked": liked }),
        if liked { "Tweet liked" } else { "Tweet unliked" },
    ))
}

/// The caller's liked videos, most recently liked first. An empty list is
/// reported as not-found, matching the possession-read contract.
pub async fn get_liked_videos(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let docs = views::liked_videos(&pool, user_id.0).await?;

    if docs.is_empty() {
        return Err(AppError::NotFound("No liked videos found".to_string()));
    }

    Ok(ApiResponse::ok(docs, "Liked videos fetched successfully"))
}
