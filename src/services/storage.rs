use std::path::Path;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::AppError;

/// Media object storage. Works against AWS S3 or any S3-compatible store
/// (MinIO, LocalStack) via the endpoint override.
#[derive(Clone)]
pub struct MediaStorage {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
}

impl MediaStorage {
    /// Build the storage client from configuration. Explicit credentials
    /// win when both halves are present; otherwise the default AWS chain
    /// (env, profile, instance role) applies.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, AppError> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id, secret, None, None, "vidtube",
            ));
        }

        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            if !endpoint.trim().is_empty() {
                builder = builder.endpoint_url(endpoint).force_path_style(true);
            }
        }

        Ok(MediaStorage {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Upload a staged file and return its public URL and storage key.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read staged file: {e}")))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload {key}: {e}")))?;

        Ok(StoredObject {
            url: self.object_url(key),
            key: key.to_string(),
        })
    }

    /// Remove an object. Callers on delete paths log and swallow the error;
    /// a leaked object must never block the enclosing request.
    pub async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete {key}: {e}")))?;

        Ok(())
    }

    pub fn object_url(&self, key: &str) -> String {
        object_url(self.endpoint.as_deref(), &self.bucket, &self.region, key)
    }
}

fn object_url(endpoint: Option<&str>, bucket: &str, region: &str, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
    }
}

/// Build a fresh storage key under `prefix`, keeping a sanitized extension
/// from the uploaded filename.
pub fn media_key(prefix: &str, original_name: &str) -> String {
    let ext: String = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(10)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .unwrap_or_default();

    if ext.is_empty() {
        format!("{}/{}", prefix, Uuid::new_v4())
    } else {
        format!("{}/{}.{}", prefix, Uuid::new_v4(), ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_uses_virtual_host_style_on_aws() {
        let url = object_url(None, "clips", "eu-west-1", "videos/a.mp4");
        assert_eq!(url, "https://clips.s3.eu-west-1.amazonaws.com/videos/a.mp4");
    }

    #[test]
    fn object_url_uses_path_style_against_custom_endpoint() {
        let url = object_url(
            Some("http://localhost:9000/"),
            "clips",
            "us-east-1",
            "videos/a.mp4",
        );
        assert_eq!(url, "http://localhost:9000/clips/videos/a.mp4");
    }

    #[test]
    fn media_key_keeps_sanitized_extension() {
        let key = media_key("videos", "My Clip.MP4");
        assert!(key.starts_with("videos/"));
        assert!(key.ends_with(".mp4"));

        let weird = media_key("thumbnails", "shot.p,n;g");
        assert!(weird.ends_with(".png"));

        let bare = media_key("videos", "noextension");
        assert!(!bare.contains('.'));
    }
}
