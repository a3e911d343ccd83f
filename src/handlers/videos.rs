use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::StreamExt as _;
use mime::Mime;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::db::video_repo::{self, CatalogFilter, NewVideo, VideoSort};
use crate::db::{views, watch_repo};
use crate::error::{AppError, Result};
use crate::middleware::{MaybeUserId, UserId};
use crate::models::Video;
use crate::response::{ApiResponse, Page, PageQuery};
use crate::services::media_probe;
use crate::services::storage::{media_key, MediaStorage};

const DEFAULT_CATALOG_LIMIT: i64 = 10;
const MAX_TITLE_CHARS: usize = 100;
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
}

/// Published-video catalog with text filter, owner filter, whitelisted
/// sorting and pagination. Anonymous-friendly; an empty page is success.
pub async fn get_all_videos(
    pool: web::Data<PgPool>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse> {
    let paging = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit, offset) = paging.resolve(DEFAULT_CATALOG_LIMIT);

    let filter = CatalogFilter {
        query: query
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(String::from),
        owner_id: query.user_id,
        sort: Some(VideoSort::from_param(query.sort_by.as_deref())),
        ascending: matches!(query.sort_type.as_deref(), Some("asc") | Some("ascending")),
    };

    let (docs, total) = video_repo::list_catalog(&pool, &filter, limit, offset).await?;

    Ok(ApiResponse::ok(
        Page::new(docs, total, page, limit),
        "Videos fetched successfully",
    ))
}

/// Publish a new video: stage the multipart upload, probe its duration,
/// push both files to object storage and insert the row. Staged temp files
/// are removed on every path.
pub async fn publish_video(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    config: web::Data<Config>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = stage_fields(payload, &config).await?;
    let result = publish_staged(&pool, &storage, &config, user_id.0, &form).await;
    form.cleanup().await;
    result
}

async fn publish_staged(
    pool: &PgPool,
    storage: &MediaStorage,
    config: &Config,
    owner_id: Uuid,
    form: &VideoForm,
) -> Result<HttpResponse> {
    let title = required_text(form.title.as_deref(), "Title")?;
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_CHARS
        )));
    }
    let description = required_text(form.description.as_deref(), "Description")?;

    let video = form
        .video
        .as_ref()
        .ok_or_else(|| AppError::Validation("Video file is required".to_string()))?;
    let thumbnail = form
        .thumbnail
        .as_ref()
        .ok_or_else(|| AppError::Validation("Thumbnail is required".to_string()))?;

    if video.content_type.type_() != mime::VIDEO {
        return Err(AppError::Validation(
            "videoFile must be a video upload".to_string(),
        ));
    }
    if thumbnail.content_type.type_() != mime::IMAGE {
        return Err(AppError::Validation(
            "thumbnail must be an image upload".to_string(),
        ));
    }

    let duration_secs = media_probe::probe_duration_secs(&config.media, &video.path)?;

    let video_key = media_key("videos", &video.original_name);
    let thumbnail_key = media_key("thumbnails", &thumbnail.original_name);

    let stored_video = storage
        .upload_file(&video.path, &video_key, video.content_type.as_ref())
        .await?;

    let stored_thumbnail = match storage
        .upload_file(&thumbnail.path, &thumbnail_key, thumbnail.content_type.as_ref())
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            // Don't leave the freshly uploaded video object orphaned.
            if let Err(del) = storage.delete_object(&stored_video.key).await {
                tracing::warn!(key = %stored_video.key, "Orphan cleanup failed: {}", del);
            }
            return Err(e);
        }
    };

    let created = video_repo::create_video(
        pool,
        NewVideo {
            owner_id,
            video_url: stored_video.url.clone(),
            video_key: stored_video.key.clone(),
            thumbnail_url: stored_thumbnail.url.clone(),
            thumbnail_key: stored_thumbnail.key.clone(),
            title: title.to_string(),
            description: description.to_string(),
            duration_secs,
        },
    )
    .await;

    let created = match created {
        Ok(video) => video,
        Err(e) => {
            for key in [&stored_video.key, &stored_thumbnail.key] {
                if let Err(del) = storage.delete_object(key).await {
                    tracing::warn!(key = %key, "Orphan cleanup failed: {}", del);
                }
            }
            return Err(e.into());
        }
    };

    tracing::info!(video_id = %created.id, owner_id = %owner_id, "Video published");

    Ok(ApiResponse::created(created, "Video published successfully"))
}

/// Single-video detail view, composed with like and subscription context
/// for the viewer. A successful read bumps the view counter and set-adds
/// the viewer's watch history; neither side effect can fail the response.
pub async fn get_video_by_id(
    pool: web::Data<PgPool>,
    viewer: MaybeUserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    let detail = views::video_detail(&pool, video_id, viewer.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if let Err(e) = video_repo::increment_views(&pool, video_id).await {
        tracing::warn!(video_id = %video_id, "Failed to bump view count: {}", e);
    }
    if let Some(user_id) = viewer.0 {
        if let Err(e) = watch_repo::record_watch(&pool, user_id, video_id).await {
            tracing::warn!(video_id = %video_id, user_id = %user_id,
                "Failed to record watch history: {}", e);
        }
    }

    Ok(ApiResponse::ok(detail, "Video fetched successfully"))
}

pub async fn update_video(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    if req.title.is_none() && req.description.is_none() {
        return Err(AppError::Validation(
            "Provide a title or description to update".to_string(),
        ));
    }

    let video_id = path.into_inner();
    owned_video(&pool, video_id, user_id.0).await?;

    let updated = video_repo::update_details(
        &pool,
        video_id,
        req.title.as_deref(),
        req.description.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(ApiResponse::ok(updated, "Video updated successfully"))
}

/// Replace the thumbnail: upload the new object, repoint the row, then
/// drop the old object. A failed old-object delete is logged, never fatal.
pub async fn update_thumbnail(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    config: web::Data<Config>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let form = stage_fields(payload, &config).await?;
    let result = replace_thumbnail(&pool, &storage, video_id, user_id.0, &form).await;
    form.cleanup().await;
    result
}

async fn replace_thumbnail(
    pool: &PgPool,
    storage: &MediaStorage,
    video_id: Uuid,
    user_id: Uuid,
    form: &VideoForm,
) -> Result<HttpResponse> {
    let thumbnail = form
        .thumbnail
        .as_ref()
        .ok_or_else(|| AppError::Validation("Thumbnail is required".to_string()))?;
    if thumbnail.content_type.type_() != mime::IMAGE {
        return Err(AppError::Validation(
            "thumbnail must be an image upload".to_string(),
        ));
    }

    let video = owned_video(pool, video_id, user_id).await?;

    let key = media_key("thumbnails", &thumbnail.original_name);
    let stored = storage
        .upload_file(&thumbnail.path, &key, thumbnail.content_type.as_ref())
        .await?;

    let updated = video_repo::update_thumbnail(pool, video_id, &stored.url, &stored.key)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if let Err(e) = storage.delete_object(&video.thumbnail_key).await {
        tracing::warn!(key = %video.thumbnail_key, "Failed to delete old thumbnail: {}", e);
    }

    Ok(ApiResponse::ok(updated, "Thumbnail updated successfully"))
}

/// Delete a video row (social context cascades in the store), then its
/// objects. Object delete failures are logged, never fatal.
pub async fn delete_video(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let video = owned_video(&pool, video_id, user_id.0).await?;

    video_repo::delete_video(&pool, video_id).await?;

    for key in [&video.video_key, &video.thumbnail_key] {
        if let Err(e) = storage.delete_object(key).await {
            tracing::warn!(key = %key, "Failed to delete media object: {}", e);
        }
    }

    Ok(ApiResponse::ok(
        json!({ "deleted": true }),
        "Video deleted successfully",
    ))
}

pub async fn toggle_publish(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    owned_video(&pool, video_id, user_id.0).await?;

    let updated = video_repo::toggle_publish(&pool, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(ApiResponse::ok(
        updated,
        "Publish status toggled successfully",
    ))
}

/// The viewer's watch history, most recently watched first.
pub async fn watch_history(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let docs = watch_repo::list_history(&pool, user_id.0).await?;

    Ok(ApiResponse::ok(docs, "Watch history fetched successfully"))
}

async fn owned_video(pool: &PgPool, video_id: Uuid, user_id: Uuid) -> Result<Video> {
    let video = video_repo::get_video(pool, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != user_id {
        return Err(AppError::Authorization(
            "Only the owner may modify this video".to_string(),
        ));
    }

    Ok(video)
}

fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

/// A multipart file staged to local disk before the storage push.
#[derive(Debug)]
struct StagedFile {
    path: PathBuf,
    original_name: String,
    content_type: Mime,
}

#[derive(Debug, Default)]
struct VideoForm {
    title: Option<String>,
    description: Option<String>,
    video: Option<StagedFile>,
    thumbnail: Option<StagedFile>,
}

impl VideoForm {
    /// Remove every staged temp file. Failures are logged; there is nothing
    /// more to do about a leaked temp file at this point.
    async fn cleanup(self) {
        for staged in [self.video, self.thumbnail].into_iter().flatten() {
            if let Err(e) = fs::remove_file(&staged.path).await {
                tracing::warn!(path = %staged.path.display(), "Failed to remove staged file: {}", e);
            }
        }
    }
}

/// Drain the multipart payload into a staged form. Unknown fields are
/// consumed and dropped so the client connection is never stalled.
async fn stage_fields(mut payload: Multipart, config: &Config) -> Result<VideoForm> {
    fs::create_dir_all(&config.media.staging_dir).await?;

    let mut form = VideoForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().to_string();

        match name.as_str() {
            "title" => form.title = Some(read_text_field(&mut field).await?),
            "description" => form.description = Some(read_text_field(&mut field).await?),
            "videoFile" => {
                form.video = Some(
                    stage_file(
                        &mut field,
                        Path::new(&config.media.staging_dir),
                        config.media.max_video_bytes,
                    )
                    .await?,
                )
            }
            "thumbnail" => {
                form.thumbnail = Some(
                    stage_file(
                        &mut field,
                        Path::new(&config.media.staging_dir),
                        config.media.max_image_bytes,
                    )
                    .await?,
                )
            }
            _ => drain_field(&mut field).await?,
        }
    }

    Ok(form)
}

async fn read_text_field(field: &mut Field) -> Result<String> {
    let mut buf = Vec::new();

    while let Some(chunk) = field.next().await {
        let bytes = chunk?;
        if buf.len() + bytes.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::Validation("Text field too large".to_string()));
        }
        buf.extend_from_slice(&bytes);
    }

    String::from_utf8(buf).map_err(|_| AppError::Validation("Text field must be UTF-8".to_string()))
}

async fn stage_file(
    field: &mut Field,
    staging_dir: &Path,
    max_bytes: usize,
) -> Result<StagedFile> {
    let original_name = field
        .content_disposition()
        .get_filename()
        .unwrap_or("upload")
        .to_string();
    let content_type = field.content_type().clone();

    let path = staging_dir.join(Uuid::new_v4().to_string());
    let mut file = fs::File::create(&path).await?;
    let mut total = 0usize;

    while let Some(chunk) = field.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }
        };

        total += bytes.len();
        if total > max_bytes {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(AppError::Validation(format!(
                "Upload exceeds the {} byte limit",
                max_bytes
            )));
        }

        file.write_all(&bytes).await?;
    }

    file.flush().await?;

    Ok(StagedFile {
        path,
        original_name,
        content_type,
    })
}

async fn drain_field(field: &mut Field) -> Result<()> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn staged(path: PathBuf, content_type: Mime) -> StagedFile {
        StagedFile {
            path,
            original_name: "upload.bin".to_string(),
            content_type,
        }
    }

    #[tokio::test]
    async fn cleanup_removes_staged_files() {
        let temp_dir = TempDir::new().unwrap();
        let video_path = temp_dir.path().join("video");
        let thumb_path = temp_dir.path().join("thumb");
        std::fs::write(&video_path, b"fake video bytes").unwrap();
        std::fs::write(&thumb_path, b"fake image bytes").unwrap();

        let form = VideoForm {
            title: Some("t".to_string()),
            description: None,
            video: Some(staged(video_path.clone(), "video/mp4".parse().unwrap())),
            thumbnail: Some(staged(thumb_path.clone(), mime::IMAGE_PNG)),
        };

        form.cleanup().await;

        assert!(!video_path.exists());
        assert!(!thumb_path.exists());
    }

    #[tokio::test]
    async fn cleanup_tolerates_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let gone = temp_dir.path().join("never-created");

        let form = VideoForm {
            video: Some(staged(gone, "video/mp4".parse().unwrap())),
            ..VideoForm::default()
        };

        // Must not panic; the warning path is the whole behavior.
        form.cleanup().await;
    }

    #[test]
    fn required_text_trims_whitespace() {
        assert_eq!(required_text(Some("  My title  "), "Title").unwrap(), "My title");
    }

    #[test]
    fn required_text_rejects_blank_and_missing() {
        assert!(required_text(Some("   "), "Title").is_err());
        assert!(required_text(None, "Title").is_err());
    }
}
