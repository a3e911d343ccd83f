use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{playlist_repo, video_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{Playlist, PlaylistDetail};
use crate::response::ApiResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlaylistRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
}

pub async fn create_playlist(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePlaylistRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let playlist = playlist_repo::create_playlist(
        &pool,
        user_id.0,
        req.name.trim(),
        req.description.trim(),
    )
    .await?;

    Ok(ApiResponse::created(
        playlist,
        "Playlist created successfully",
    ))
}

/// A user's playlists with membership counts. No playlists is reported as
/// not-found, matching the possession-read contract.
pub async fn get_user_playlists(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let owner_id = path.into_inner();
    let playlists = playlist_repo::list_user_playlists(&pool, owner_id).await?;

    if playlists.is_empty() {
        return Err(AppError::NotFound("No playlists found".to_string()));
    }

    Ok(ApiResponse::ok(playlists, "Playlists fetched successfully"))
}

/// A playlist with its videos in playlist order.
pub async fn get_playlist_by_id(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let playlist_id = path.into_inner();

    let playlist = playlist_repo::get_playlist(&pool, playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
    let videos = playlist_repo::playlist_videos(&pool, playlist_id).await?;

    let detail = PlaylistDetail {
        id: playlist.id,
        owner_id: playlist.owner_id,
        name: playlist.name,
        description: playlist.description,
        created_at: playlist.created_at,
        updated_at: playlist.updated_at,
        videos,
    };

    Ok(ApiResponse::ok(detail, "Playlist fetched successfully"))
}

pub async fn update_playlist(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePlaylistRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    if req.name.is_none() && req.description.is_none() {
        return Err(AppError::Validation(
            "Provide a name or description to update".to_string(),
        ));
    }

    let playlist_id = path.into_inner();
    owned_playlist(&pool, playlist_id, user_id.0).await?;

    let updated = playlist_repo::update_playlist(
        &pool,
        playlist_id,
        req.name.as_deref().map(str::trim),
        req.description.as_deref().map(str::trim),
    )
    .await?;

    Ok(ApiResponse::ok(updated, "Playlist updated successfully"))
}

pub async fn delete_playlist(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let playlist_id = path.into_inner();
    owned_playlist(&pool, playlist_id, user_id.0).await?;

    playlist_repo::delete_playlist(&pool, playlist_id).await?;

    Ok(ApiResponse::ok(
        json!({ "deleted": true }),
        "Playlist deleted successfully",
    ))
}

/// Append a video to a playlist. Adding the same video twice produces two
/// entries.
pub async fn add_video_to_playlist(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (playlist_id, video_id) = path.into_inner();
    owned_playlist(&pool, playlist_id, user_id.0).await?;

    if !video_repo::video_exists(&pool, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    playlist_repo::add_video(&pool, playlist_id, video_id).await?;

    Ok(ApiResponse::ok(
        json!({ "added": true }),
        "Video added to playlist",
    ))
}

/// Remove every occurrence of a video from a playlist.
pub async fn remove_video_from_playlist(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (playlist_id, video_id) = path.into_inner();
    owned_playlist(&pool, playlist_id, user_id.0).await?;

    let removed = playlist_repo::remove_video(&pool, playlist_id, video_id).await?;

    Ok(ApiResponse::ok(
        json!({ "removed": removed }),
        "Video removed from playlist",
    ))
}

async fn owned_playlist(pool: &PgPool, playlist_id: Uuid, user_id: Uuid) -> Result<Playlist> {
    let playlist = playlist_repo::get_playlist(pool, playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    if playlist.owner_id != user_id {
        return Err(AppError::Authorization(
            "You can only modify your own playlists".to_string(),
        ));
    }

    Ok(playlist)
}
