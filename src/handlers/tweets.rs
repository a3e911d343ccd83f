use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::tweet_repo;
use crate::error::{AppError, Result};
use crate::middleware::{MaybeUserId, UserId};
use crate::models::Tweet;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct TweetRequest {
    #[validate(length(min = 1, max = 280, message = "Tweet must be 1-280 characters"))]
    pub content: String,
}

pub async fn create_tweet(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<TweetRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let tweet = tweet_repo::create_tweet(&pool, user_id.0, req.content.trim()).await?;

    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// A user's tweets newest first, with like context for the viewer. No
/// tweets is reported as not-found, matching the possession-read contract.
pub async fn get_user_tweets(
    pool: web::Data<PgPool>,
    viewer: MaybeUserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let owner_id = path.into_inner();
    let tweets = tweet_repo::list_user_tweets(&pool, owner_id, viewer.0).await?;

    if tweets.is_empty() {
        return Err(AppError::NotFound("No tweets found".to_string()));
    }

    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

pub async fn update_tweet(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<TweetRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let tweet_id = path.into_inner();
    owned_tweet(&pool, tweet_id, user_id.0).await?;

    let updated = tweet_repo::update_tweet(&pool, tweet_id, req.content.trim()).await?;

    Ok(ApiResponse::ok(updated, "Tweet updated successfully"))
}

pub async fn delete_tweet(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = path.into_inner();
    owned_tweet(&pool, tweet_id, user_id.0).await?;

    tweet_repo::delete_tweet(&pool, tweet_id).await?;

    Ok(ApiResponse::ok(
        json!({ "deleted": true }),
        "Tweet deleted successfully",
    ))
}

async fn owned_tweet(pool: &PgPool, tweet_id: Uuid, user_id: Uuid) -> Result<Tweet> {
    let tweet = tweet_repo::get_tweet(pool, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    if tweet.owner_id != user_id {
        return Err(AppError::Authorization(
            "You can only modify your own tweets".to_string(),
        ));
    }

    Ok(tweet)
}
