use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::subscription_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::response::ApiResponse;

/// Toggle the caller's subscription to a channel. Subscribing to yourself
/// is rejected before the store is touched.
pub async fn toggle_subscription(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    if channel_id == user_id.0 {
        return Err(AppError::Validation(
            "You cannot subscribe to your own channel".to_string(),
        ));
    }

    if !subscription_repo::channel_exists(&pool, channel_id).await? {
        return Err(AppError::NotFound("Channel not found".to_string()));
    }

    let subscribed = subscription_repo::toggle(&pool, user_id.0, channel_id).await?;

    Ok(ApiResponse::ok(
        json!({ "subscribed": subscribed }),
        if subscribed {
            "Subscribed successfully"
        } else {
            "Unsubscribed successfully"
        },
    ))
}

/// Profiles of a channel's subscribers. An empty list is a success.
pub async fn get_channel_subscribers(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();
    let subscribers = subscription_repo::list_subscribers(&pool, channel_id).await?;

    Ok(ApiResponse::ok(
        subscribers,
        "Subscribers fetched successfully",
    ))
}

/// Channels a user subscribes to. An empty list is a success.
pub async fn get_subscribed_channels(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let subscriber_id = path.into_inner();
    let channels = subscription_repo::list_subscribed_channels(&pool, subscriber_id).await?;

    Ok(ApiResponse::ok(
        channels,
        "Subscribed channels fetched successfully",
    ))
}
