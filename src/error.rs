use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed: {}", .0.join("; "))]
    FieldValidation(Vec<String>),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Error body matching the client-facing envelope: `success` is always
/// false, `statusCode` mirrors the HTTP status, and `errors` carries
/// field-level detail (empty outside request validation).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
    success: bool,
    errors: Vec<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::FieldValidation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Server-side failure detail stays in the logs; the wire gets a
        // generic line. Client-addressable errors pass through verbatim.
        let (message, errors) = match self {
            AppError::Validation(msg)
            | AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => (msg.clone(), Vec::new()),
            AppError::FieldValidation(details) => {
                ("Validation failed".to_string(), details.clone())
            }
            AppError::Token(_) => ("Invalid or expired token".to_string(), Vec::new()),
            AppError::Database(_) | AppError::Internal(_) | AppError::Storage(_) => {
                tracing::error!("{}", self);
                ("Something went wrong".to_string(), Vec::new())
            }
        };

        HttpResponse::build(status_code).json(ErrorBody {
            status_code: status_code.as_u16(),
            message,
            success: false,
            errors,
        })
    }
}

// Convert validator errors to AppError, keeping each field message for the
// envelope's `errors` list.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        AppError::FieldValidation(details)
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(error: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Multipart error: {}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_taxonomy() {
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::FieldValidation(vec!["bad field".into()]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Authentication("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Authorization("not owner".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("video".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Storage("s3".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn client_facing_message_is_passed_through_verbatim() {
        let resp = AppError::NotFound("Video not found".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["message"], "Video not found");
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn field_validation_failures_populate_the_errors_list() {
        use validator::Validate;

        #[derive(Validate)]
        struct TitlePayload {
            #[validate(length(min = 1, message = "Title is required"))]
            title: String,
        }

        let err: AppError = TitlePayload {
            title: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"], serde_json::json!(["Title is required"]));
    }

    #[tokio::test]
    async fn database_detail_never_reaches_the_wire() {
        let resp = AppError::Database(sqlx::Error::PoolTimedOut).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Something went wrong");
    }
}
