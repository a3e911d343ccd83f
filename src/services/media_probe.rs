use std::path::Path;
use std::process::Command;

use serde_json::Value;

use crate::config::MediaConfig;
use crate::error::AppError;

/// Read a media file's duration in seconds via ffprobe's JSON output.
/// With `mock_duration_secs` configured the subprocess is skipped entirely,
/// which keeps test environments free of an ffmpeg install.
pub fn probe_duration_secs(config: &MediaConfig, path: &Path) -> Result<f32, AppError> {
    if let Some(mock) = config.mock_duration_secs {
        return Ok(mock);
    }

    let output = Command::new(&config.ffprobe_path)
        .args([
            "-v",
            "error",
            "-show_format",
            "-of",
            "json",
            path.to_string_lossy().as_ref(),
        ])
        .output()
        .map_err(|e| AppError::Internal(format!("ffprobe spawn error: {}", e)))?;

    if !output.status.success() {
        return Err(AppError::Internal(format!(
            "ffprobe failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let json: Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| AppError::Internal(format!("ffprobe json parse: {}", e)))?;

    Ok(parse_duration(&json))
}

/// ffprobe reports `format.duration` as a decimal string. Missing or
/// unparsable values fall back to zero rather than failing the publish.
fn parse_duration(json: &Value) -> f32 {
    json.get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_duration_string() {
        let json: Value = serde_json::json!({
            "format": { "filename": "a.mp4", "duration": "12.640000" }
        });
        assert!((parse_duration(&json) - 12.64).abs() < 0.001);
    }

    #[test]
    fn missing_duration_falls_back_to_zero() {
        let json: Value = serde_json::json!({ "format": {} });
        assert_eq!(parse_duration(&json), 0.0);

        let empty: Value = serde_json::json!({});
        assert_eq!(parse_duration(&empty), 0.0);
    }

    #[test]
    fn mock_duration_skips_the_subprocess() {
        let config = MediaConfig {
            staging_dir: "/tmp".into(),
            max_video_bytes: 1,
            max_image_bytes: 1,
            ffprobe_path: "/definitely/not/here".into(),
            mock_duration_secs: Some(42.5),
        };

        let d = probe_duration_secs(&config, Path::new("/nonexistent.mp4")).unwrap();
        assert_eq!(d, 42.5);
    }
}
