/// vidtube API server
///
/// Video sharing backend: channels, video upload and publishing, comments,
/// likes, subscriptions, playlists and channel dashboards.
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidtube::routes::configure_routes;
use vidtube::services::storage::MediaStorage;
use vidtube::Config;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting vidtube v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.server.env);

    // Initialize database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    // Verify database connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Failed to verify database connection")?;

    // Run database migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    // Initialize object storage client
    let storage = MediaStorage::from_config(&config.storage)
        .await
        .context("Failed to initialize object storage")?;

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", bind_address);

    let app_config = config.clone();
    HttpServer::new(move || {
        // Build CORS configuration from allowed_origins
        let mut cors = Cors::default();
        for origin in app_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .max_age(app_config.cors.max_age as usize);

        App::new()
            .app_data(web::Data::new(app_config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    info!("vidtube shutting down");
    Ok(())
}
