//! Route configuration
//!
//! Each domain (videos, comments, likes, etc.) manages its own routes.
//! Anonymous-capable routes are registered first; the rest of each scope
//! sits behind `JwtAuth`.

use crate::handlers;
use crate::middleware::JwtAuth;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/healthcheck", web::get().to(handlers::health::healthcheck))
            // Modular route configuration
            .configure(routes::videos::configure)
            .configure(routes::comments::configure)
            .configure(routes::likes::configure)
            .configure(routes::subscriptions::configure)
            .configure(routes::playlists::configure)
            .configure(routes::tweets::configure)
            .configure(routes::dashboard::configure),
    );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod videos {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/videos")
                    .route("", web::get().to(handlers::videos::get_all_videos))
                    // Registered ahead of "/{video_id}" so the literal
                    // segment wins the pattern match.
                    .service(
                        web::scope("/history")
                            .wrap(JwtAuth)
                            .route("", web::get().to(handlers::videos::watch_history)),
                    )
                    .route(
                        "/{video_id}",
                        web::get().to(handlers::videos::get_video_by_id),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route("", web::post().to(handlers::videos::publish_video))
                            .route(
                                "/{video_id}",
                                web::patch().to(handlers::videos::update_video),
                            )
                            .route(
                                "/{video_id}",
                                web::delete().to(handlers::videos::delete_video),
                            )
                            .route(
                                "/{video_id}/thumbnail",
                                web::patch().to(handlers::videos::update_thumbnail),
                            )
                            .route(
                                "/{video_id}/publish",
                                web::patch().to(handlers::videos::toggle_publish),
                            ),
                    ),
            );
        }
    }

    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/comments")
                    .route(
                        "/video/{video_id}",
                        web::get().to(handlers::comments::get_video_comments),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route(
                                "/video/{video_id}",
                                web::post().to(handlers::comments::add_comment),
                            )
                            .route(
                                "/{comment_id}",
                                web::patch().to(handlers::comments::update_comment),
                            )
                            .route(
                                "/{comment_id}",
                                web::delete().to(handlers::comments::delete_comment),
                            ),
                    ),
            );
        }
    }

    pub mod likes {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/likes")
                    .wrap(JwtAuth)
                    .route(
                        "/video/{video_id}",
                        web::post().to(handlers::likes::toggle_video_like),
                    )
                    .route(
                        "/comment/{comment_id}",
                        web::post().to(handlers::likes::toggle_comment_like),
                    )
                    .route(
                        "/tweet/{tweet_id}",
                        web::post().to(handlers::likes::toggle_tweet_like),
                    )
                    .route("/videos", web::get().to(handlers::likes::get_liked_videos)),
            );
        }
    }

    pub mod subscriptions {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/subscriptions")
                    .route(
                        "/channel/{channel_id}/subscribers",
                        web::get().to(handlers::subscriptions::get_channel_subscribers),
                    )
                    .route(
                        "/user/{subscriber_id}/channels",
                        web::get().to(handlers::subscriptions::get_subscribed_channels),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route(
                                "/channel/{channel_id}",
                                web::post().to(handlers::subscriptions::toggle_subscription),
                            ),
                    ),
            );
        }
    }

    pub mod playlists {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/playlists")
                    .route(
                        "/user/{user_id}",
                        web::get().to(handlers::playlists::get_user_playlists),
                    )
                    .route(
                        "/{playlist_id}",
                        web::get().to(handlers::playlists::get_playlist_by_id),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route("", web::post().to(handlers::playlists::create_playlist))
                            .route(
                                "/{playlist_id}",
                                web::patch().to(handlers::playlists::update_playlist),
                            )
                            .route(
                                "/{playlist_id}",
                                web::delete().to(handlers::playlists::delete_playlist),
                            )
                            .route(
                                "/{playlist_id}/videos/{video_id}",
                                web::post().to(handlers::playlists::add_video_to_playlist),
                            )
                            .route(
                                "/{playlist_id}/videos/{video_id}",
                                web::delete().to(handlers::playlists::remove_video_from_playlist),
                            ),
                    ),
            );
        }
    }

    pub mod tweets {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/tweets")
                    .route(
                        "/user/{user_id}",
                        web::get().to(handlers::tweets::get_user_tweets),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route("", web::post().to(handlers::tweets::create_tweet))
                            .route(
                                "/{tweet_id}",
                                web::patch().to(handlers::tweets::update_tweet),
                            )
                            .route(
                                "/{tweet_id}",
                                web::delete().to(handlers::tweets::delete_tweet),
                            ),
                    ),
            );
        }
    }

    pub mod dashboard {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/dashboard")
                    .wrap(JwtAuth)
                    .route(
                        "/stats",
                        web::get().to(handlers::dashboard::get_channel_stats),
                    )
                    .route(
                        "/videos",
                        web::get().to(handlers::dashboard::get_channel_videos),
                    ),
            );
        }
    }
}
