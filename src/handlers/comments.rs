use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{comment_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::{MaybeUserId, UserId};
use crate::models::Comment;
use crate::response::{ApiResponse, Page, PageQuery};

const DEFAULT_COMMENT_LIMIT: i64 = 15;

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 500, message = "Comment must be 1-500 characters"))]
    pub content: String,
}

/// Newest-first comment page for a video, with owner profile and like
/// context for the viewer.
pub async fn get_video_comments(
    pool: web::Data<PgPool>,
    viewer: MaybeUserId,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    if !video_repo::video_exists(&pool, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let (page, limit, offset) = query.resolve(DEFAULT_COMMENT_LIMIT);
    let (docs, total) =
        comment_repo::list_for_video(&pool, video_id, viewer.0, limit, offset).await?;

    Ok(ApiResponse::ok(
        Page::new(docs, total, page, limit),
        "Comments fetched successfully",
    ))
}

pub async fn add_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let video_id = path.into_inner();
    if !video_repo::video_exists(&pool, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let comment =
        comment_repo::create_comment(&pool, video_id, user_id.0, req.content.trim()).await?;

    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

pub async fn update_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment_id = path.into_inner();
    owned_comment(&pool, comment_id, user_id.0).await?;

    let updated = comment_repo::update_comment(&pool, comment_id, req.content.trim()).await?;

    Ok(ApiResponse::ok(updated, "Comment updated successfully"))
}

pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();
    owned_comment(&pool, comment_id, user_id.0).await?;

    comment_repo::delete_comment(&pool, comment_id).await?;

    Ok(ApiResponse::ok(
        json!({ "deleted": true }),
        "Comment deleted successfully",
    ))
}

async fn owned_comment(pool: &PgPool, comment_id: Uuid, user_id: Uuid) -> Result<Comment> {
    let comment = comment_repo::get_comment(pool, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.owner_id != user_id {
        return Err(AppError::Authorization(
            "You can only modify your own comments".to_string(),
        ));
    }

    Ok(comment)
}
