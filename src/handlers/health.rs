use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::error::Result;
use crate::response::ApiResponse;

/// Liveness probe with a database round-trip. A failing pool surfaces as
/// the standard 500 envelope.
pub async fn healthcheck(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await?;

    Ok(ApiResponse::ok(
        json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        }),
        "Service is healthy",
    ))
}
