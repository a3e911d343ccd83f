/// Integration tests for the derived-view composition layer.
/// Every document is composed at read time; these tests pin the counts,
/// viewer flags and orderings the compositions must produce.
mod common;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;
    use vidtube::db::{like_repo, subscription_repo, video_repo, views, watch_repo};

    use crate::common::fixtures;

    #[tokio::test]
    #[ignore] // Requires database
    async fn video_detail_composes_counts_and_viewer_flags() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let viewer = fixtures::create_test_user(&pool).await;
        let video = fixtures::create_test_video(&pool, owner.id).await;

        like_repo::toggle_video_like(&pool, video.id, viewer.id)
            .await
            .unwrap();
        subscription_repo::toggle(&pool, viewer.id, owner.id)
            .await
            .unwrap();

        let detail = views::video_detail(&pool, video.id, Some(viewer.id))
            .await
            .unwrap()
            .expect("video should exist");

        assert_eq!(detail.id, video.id);
        assert_eq!(detail.likes_count, 1);
        assert!(detail.is_liked);

        let channel = detail.owner.expect("owner profile should be present");
        assert_eq!(channel.id, owner.id);
        assert_eq!(channel.username, owner.username);
        assert_eq!(channel.subscribers_count, 1);
        assert!(channel.is_subscribed);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn video_detail_flags_are_false_for_anonymous_viewers() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let fan = fixtures::create_test_user(&pool).await;
        let video = fixtures::create_test_video(&pool, owner.id).await;

        like_repo::toggle_video_like(&pool, video.id, fan.id)
            .await
            .unwrap();
        subscription_repo::toggle(&pool, fan.id, owner.id)
            .await
            .unwrap();

        let detail = views::video_detail(&pool, video.id, None)
            .await
            .unwrap()
            .expect("video should exist");

        // Counts are global, flags are viewer-scoped.
        assert_eq!(detail.likes_count, 1);
        assert!(!detail.is_liked);

        let channel = detail.owner.expect("owner profile should be present");
        assert_eq!(channel.subscribers_count, 1);
        assert!(!channel.is_subscribed);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn video_detail_is_none_for_unknown_id() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let detail = views::video_detail(&pool, Uuid::new_v4(), None)
            .await
            .unwrap();
        assert!(detail.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn liked_videos_lists_most_recently_liked_first() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let viewer = fixtures::create_test_user(&pool).await;
        let first = fixtures::create_test_video_with(&pool, owner.id, "First", true).await;
        let second = fixtures::create_test_video_with(&pool, owner.id, "Second", true).await;

        like_repo::toggle_video_like(&pool, first.id, viewer.id)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        like_repo::toggle_video_like(&pool, second.id, viewer.id)
            .await
            .unwrap();

        let entries = views::liked_videos(&pool, viewer.id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].liked_video.id, second.id);
        assert_eq!(entries[1].liked_video.id, first.id);
        assert!(entries[0].liked_video.owner.is_some());

        // Comment likes must not leak into the video listing.
        let comment = fixtures::create_test_comment(&pool, first.id, owner.id).await;
        like_repo::toggle_comment_like(&pool, comment.id, viewer.id)
            .await
            .unwrap();
        let entries = views::liked_videos(&pool, viewer.id).await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn liked_videos_is_empty_for_a_user_with_no_likes() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let viewer = fixtures::create_test_user(&pool).await;
        let entries = views::liked_videos(&pool, viewer.id).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn channel_stats_are_all_zeros_without_activity() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let channel = fixtures::create_test_user(&pool).await;
        let stats = views::channel_stats(&pool, channel.id).await.unwrap();

        assert_eq!(stats.total_views, 0);
        assert_eq!(stats.total_subscribers, 0);
        assert_eq!(stats.total_videos, 0);
        assert_eq!(stats.total_likes, 0);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn channel_stats_aggregate_across_the_channels_videos() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let channel = fixtures::create_test_user(&pool).await;
        let fan = fixtures::create_test_user(&pool).await;
        let other_fan = fixtures::create_test_user(&pool).await;

        let first = fixtures::create_test_video_with(&pool, channel.id, "First", true).await;
        let second = fixtures::create_test_video_with(&pool, channel.id, "Second", false).await;

        sqlx::query("UPDATE videos SET views = $2 WHERE id = $1")
            .bind(first.id)
            .bind(10_i64)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE videos SET views = $2 WHERE id = $1")
            .bind(second.id)
            .bind(5_i64)
            .execute(&pool)
            .await
            .unwrap();

        subscription_repo::toggle(&pool, fan.id, channel.id)
            .await
            .unwrap();
        like_repo::toggle_video_like(&pool, first.id, fan.id)
            .await
            .unwrap();
        like_repo::toggle_video_like(&pool, first.id, other_fan.id)
            .await
            .unwrap();
        like_repo::toggle_video_like(&pool, second.id, fan.id)
            .await
            .unwrap();

        // A foreign channel's video must not count.
        let outsider = fixtures::create_test_user(&pool).await;
        let foreign = fixtures::create_test_video(&pool, outsider.id).await;
        like_repo::toggle_video_like(&pool, foreign.id, fan.id)
            .await
            .unwrap();

        let stats = views::channel_stats(&pool, channel.id).await.unwrap();
        assert_eq!(stats.total_views, 15);
        assert_eq!(stats.total_subscribers, 1);
        assert_eq!(stats.total_videos, 2);
        assert_eq!(stats.total_likes, 3);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn view_counter_moves_forward_by_one() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let video = fixtures::create_test_video(&pool, owner.id).await;

        let before = views::video_detail(&pool, video.id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before.views, 0);

        video_repo::increment_views(&pool, video.id).await.unwrap();

        let after = views::video_detail(&pool, video.id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.views, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn rewatching_refreshes_history_instead_of_duplicating() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let owner = fixtures::create_test_user(&pool).await;
        let viewer = fixtures::create_test_user(&pool).await;
        let first = fixtures::create_test_video_with(&pool, owner.id, "First", true).await;
        let second = fixtures::create_test_video_with(&pool, owner.id, "Second", true).await;

        watch_repo::record_watch(&pool, viewer.id, first.id)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        watch_repo::record_watch(&pool, viewer.id, second.id)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        watch_repo::record_watch(&pool, viewer.id, first.id)
            .await
            .unwrap();

        let history = watch_repo::list_history(&pool, viewer.id).await.unwrap();
        assert_eq!(history.len(), 2);
        // The rewatch moved First back to the top.
        assert_eq!(history[0].id, first.id);
        assert_eq!(history[1].id, second.id);
    }
}
