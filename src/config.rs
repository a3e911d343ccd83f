/// Configuration management
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub media: MediaConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins. "*" allows any origin.
    pub allowed_origins: String,
    pub max_age: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MediaConfig {
    /// Directory where multipart uploads are staged before the storage push.
    pub staging_dir: String,
    pub max_video_bytes: usize,
    pub max_image_bytes: usize,
    pub ffprobe_path: String,
    /// When set, skip the ffprobe subprocess and report this duration.
    /// Intended for test environments without ffmpeg installed.
    pub mock_duration_secs: Option<f32>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: std::env::var("VIDTUBE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("VIDTUBE_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/vidtube".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "dev-secret-change-me".to_string()),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
                max_age: std::env::var("CORS_MAX_AGE")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .unwrap_or(3600),
            },
            storage: StorageConfig {
                bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "vidtube-media".to_string()),
                region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
                endpoint: std::env::var("S3_ENDPOINT").ok(),
            },
            media: MediaConfig {
                staging_dir: std::env::var("UPLOAD_STAGING_DIR")
                    .unwrap_or_else(|_| std::env::temp_dir().join("vidtube-uploads").display().to_string()),
                max_video_bytes: std::env::var("MAX_VIDEO_BYTES")
                    .unwrap_or_else(|_| "209715200".to_string())
                    .parse()
                    .unwrap_or(209_715_200),
                max_image_bytes: std::env::var("MAX_IMAGE_BYTES")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .unwrap_or(10_485_760),
                ffprobe_path: std::env::var("FFPROBE_PATH")
                    .unwrap_or_else(|_| "ffprobe".to_string()),
                mock_duration_secs: std::env::var("FFPROBE_MOCK_DURATION")
                    .ok()
                    .and_then(|v| v.parse().ok()),
            },
        })
    }
}
