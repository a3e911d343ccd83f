/// Integration tests for the like and subscription toggle primitives.
/// Each toggle must be atomic: one row on, zero rows off, per (user, subject).
mod common;

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use uuid::Uuid;
    use vidtube::db::{like_repo, subscription_repo};

    use crate::common::fixtures;

    async fn video_like_count(pool: &PgPool, video_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(pool)
            .await
            .expect("count query failed")
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn video_like_toggles_on_then_off() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let viewer = fixtures::create_test_user(&pool).await;
        let video = fixtures::create_test_video(&pool, owner.id).await;

        let liked = like_repo::toggle_video_like(&pool, video.id, viewer.id)
            .await
            .unwrap();
        assert!(liked);
        assert_eq!(video_like_count(&pool, video.id).await, 1);

        let liked = like_repo::toggle_video_like(&pool, video.id, viewer.id)
            .await
            .unwrap();
        assert!(!liked);
        assert_eq!(video_like_count(&pool, video.id).await, 0);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn like_state_is_per_user() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let alice = fixtures::create_test_user(&pool).await;
        let bob = fixtures::create_test_user(&pool).await;
        let video = fixtures::create_test_video(&pool, owner.id).await;

        assert!(like_repo::toggle_video_like(&pool, video.id, alice.id)
            .await
            .unwrap());
        assert!(like_repo::toggle_video_like(&pool, video.id, bob.id)
            .await
            .unwrap());
        assert_eq!(video_like_count(&pool, video.id).await, 2);

        // Alice withdrawing must not disturb Bob's like.
        assert!(!like_repo::toggle_video_like(&pool, video.id, alice.id)
            .await
            .unwrap());
        assert_eq!(video_like_count(&pool, video.id).await, 1);

        let bob_still_liked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE video_id = $1 AND liked_by = $2)",
        )
        .bind(video.id)
        .bind(bob.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(bob_still_liked);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn duplicate_like_is_rejected_by_unique_index() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let viewer = fixtures::create_test_user(&pool).await;
        let video = fixtures::create_test_video(&pool, owner.id).await;

        assert!(like_repo::toggle_video_like(&pool, video.id, viewer.id)
            .await
            .unwrap());

        // A raw second insert must hit uq_likes_video.
        let result = sqlx::query("INSERT INTO likes (video_id, liked_by) VALUES ($1, $2)")
            .bind(video.id)
            .bind(viewer.id)
            .execute(&pool)
            .await;
        assert!(result.is_err());
        assert_eq!(video_like_count(&pool, video.id).await, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn comment_and_tweet_likes_toggle_independently() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let viewer = fixtures::create_test_user(&pool).await;
        let video = fixtures::create_test_video(&pool, owner.id).await;
        let comment = fixtures::create_test_comment(&pool, video.id, owner.id).await;
        let tweet = fixtures::create_test_tweet(&pool, owner.id).await;

        assert!(like_repo::toggle_comment_like(&pool, comment.id, viewer.id)
            .await
            .unwrap());
        assert!(like_repo::toggle_tweet_like(&pool, tweet.id, viewer.id)
            .await
            .unwrap());

        // Unliking the comment leaves the tweet like standing.
        assert!(!like_repo::toggle_comment_like(&pool, comment.id, viewer.id)
            .await
            .unwrap());

        let tweet_likes =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE tweet_id = $1")
                .bind(tweet.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(tweet_likes, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn subscription_toggles_on_then_off() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let channel = fixtures::create_test_user(&pool).await;
        let fan = fixtures::create_test_user(&pool).await;

        assert!(subscription_repo::toggle(&pool, fan.id, channel.id)
            .await
            .unwrap());

        let subscribers = subscription_repo::list_subscribers(&pool, channel.id)
            .await
            .unwrap();
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].id, fan.id);

        assert!(!subscription_repo::toggle(&pool, fan.id, channel.id)
            .await
            .unwrap());

        let subscribers = subscription_repo::list_subscribers(&pool, channel.id)
            .await
            .unwrap();
        assert!(subscribers.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn self_subscription_is_rejected_by_check_constraint() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let channel = fixtures::create_test_user(&pool).await;

        let result =
            sqlx::query("INSERT INTO subscriptions (subscriber_id, channel_id) VALUES ($1, $1)")
                .bind(channel.id)
                .execute(&pool)
                .await;
        assert!(result.is_err());
    }
}
