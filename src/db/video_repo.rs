use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{VideoDocRow, VIDEO_DOC_COLUMNS};
use crate::models::{Video, VideoDoc};

/// Fields required to register a newly uploaded video.
#[derive(Debug)]
pub struct NewVideo {
    pub owner_id: Uuid,
    pub video_url: String,
    pub video_key: String,
    pub thumbnail_url: String,
    pub thumbnail_key: String,
    pub title: String,
    pub description: String,
    pub duration_secs: f32,
}

/// Catalog sort keys. Mapped to fixed column idents; user input never
/// reaches the SQL text directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSort {
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSort {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("views") => VideoSort::Views,
            Some("duration") => VideoSort::Duration,
            Some("title") => VideoSort::Title,
            _ => VideoSort::CreatedAt,
        }
    }

    fn column(self) -> &'static str {
        match self {
            VideoSort::CreatedAt => "v.created_at",
            VideoSort::Views => "v.views",
            VideoSort::Duration => "v.duration_secs",
            VideoSort::Title => "v.title",
        }
    }
}

/// Catalog listing filter.
#[derive(Debug, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring match against title and description.
    /// Wildcard characters in the term match literally.
    pub query: Option<String>,
    pub owner_id: Option<Uuid>,
    pub sort: Option<VideoSort>,
    pub ascending: bool,
}

/// Escape LIKE wildcards so the search term matches literally. Backslash is
/// the Postgres default escape character.
fn escape_like_pattern(term: &str) -> String {
    term.replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}

pub async fn create_video(pool: &PgPool, new: NewVideo) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        r#"
        INSERT INTO videos (owner_id, video_url, video_key, thumbnail_url, thumbnail_key,
                            title, description, duration_secs)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(new.owner_id)
    .bind(&new.video_url)
    .bind(&new.video_key)
    .bind(&new.thumbnail_url)
    .bind(&new.thumbnail_key)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.duration_secs)
    .fetch_one(pool)
    .await
}

pub async fn get_video(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
        .bind(video_id)
        .fetch_optional(pool)
        .await
}

pub async fn video_exists(pool: &PgPool, video_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)")
        .bind(video_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<bool, _>(0))
}

/// Update title and/or description; absent fields keep their value.
pub async fn update_details(
    pool: &PgPool,
    video_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        r#"
        UPDATE videos
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(video_id)
    .bind(title)
    .bind(description)
    .fetch_optional(pool)
    .await
}

pub async fn update_thumbnail(
    pool: &PgPool,
    video_id: Uuid,
    thumbnail_url: &str,
    thumbnail_key: &str,
) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        r#"
        UPDATE videos
        SET thumbnail_url = $2, thumbnail_key = $3, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(video_id)
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .fetch_optional(pool)
    .await
}

pub async fn delete_video(pool: &PgPool, video_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Atomically flip the publish flag, returning the updated row.
pub async fn toggle_publish(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        r#"
        UPDATE videos
        SET is_published = NOT is_published, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await
}

/// Bump the view counter. Runs outside the read path; the caller logs and
/// swallows failures.
pub async fn increment_views(pool: &PgPool, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Published-only catalog page plus the total match count.
pub async fn list_catalog(
    pool: &PgPool,
    filter: &CatalogFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<VideoDoc>, i64), sqlx::Error> {
    let sort = filter.sort.unwrap_or(VideoSort::CreatedAt);
    let direction = if filter.ascending { "ASC" } else { "DESC" };
    let search = filter.query.as_deref().map(escape_like_pattern);

    const CATALOG_WHERE: &str = r#"
        WHERE v.is_published = TRUE
          AND ($1::uuid IS NULL OR v.owner_id = $1)
          AND ($2::text IS NULL
               OR v.title ILIKE '%' || $2 || '%'
               OR v.description ILIKE '%' || $2 || '%')
    "#;

    // Sort column/direction come from the fixed whitelist above.
    let select = format!(
        "SELECT {VIDEO_DOC_COLUMNS} FROM videos v \
         LEFT JOIN users u ON u.id = v.owner_id \
         {CATALOG_WHERE} ORDER BY {} {} LIMIT $3 OFFSET $4",
        sort.column(),
        direction,
    );

    let rows = sqlx::query_as::<_, VideoDocRow>(&select)
        .bind(filter.owner_id)
        .bind(search.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM videos v {CATALOG_WHERE}");
    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(filter.owner_id)
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

    Ok((rows.into_iter().map(VideoDocRow::into_doc).collect(), total))
}

/// Every video of a channel, drafts included, newest first. Dashboard view.
pub async fn list_channel_videos(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<VideoDoc>, sqlx::Error> {
    let sql = format!(
        "SELECT {VIDEO_DOC_COLUMNS} FROM videos v \
         LEFT JOIN users u ON u.id = v.owner_id \
         WHERE v.owner_id = $1 ORDER BY v.created_at DESC"
    );

    let rows = sqlx::query_as::<_, VideoDocRow>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(VideoDocRow::into_doc).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_terms_escape_like_wildcards() {
        assert_eq!(escape_like_pattern("100%"), r"100\%");
        assert_eq!(escape_like_pattern("snake_case"), r"snake\_case");
        assert_eq!(escape_like_pattern(r"a\b"), r"a\\b");
        assert_eq!(escape_like_pattern("plain title"), "plain title");
    }
}
