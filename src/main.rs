//! Naebak News - news content delivery service

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use naebak_news::{
    api::{self, AppState, RequestStats},
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCategoryRepository, SqlxCommentRepository, SqlxNewsItemRepository,
            SqlxSettingsRepository, SqlxStatsRepository, SqlxTagRepository,
        },
    },
    seed::SeedLoader,
    services::{CategoryService, NewsService, RateLimiter, StatsService, TagService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "naebak_news=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Naebak news service...");

    // Load configuration (file, then environment overrides)
    let config = Arc::new(Config::load_with_env(Path::new("config.yml"))?);
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize cache
    let cache = create_cache(&config.cache).await?;
    tracing::info!("Cache initialized");

    // Create repositories
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let tag_repo = SqlxTagRepository::boxed(pool.clone());
    let news_repo = SqlxNewsItemRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());
    let settings_repo = SqlxSettingsRepository::boxed(pool.clone());
    let stats_repo = SqlxStatsRepository::boxed(pool.clone());

    // Initialize services
    let news_service = Arc::new(NewsService::new(
        news_repo.clone(),
        category_repo.clone(),
        tag_repo.clone(),
    ));
    let category_service = Arc::new(CategoryService::new(category_repo.clone(), cache.clone()));
    let tag_service = Arc::new(TagService::new(tag_repo.clone(), cache.clone()));
    let stats_service = Arc::new(StatsService::new(
        stats_repo.clone(),
        news_repo.clone(),
        category_repo.clone(),
        tag_repo.clone(),
        comment_repo.clone(),
    ));
    let seed_loader = Arc::new(SeedLoader::new(
        category_repo,
        tag_repo,
        news_repo,
        comment_repo,
        settings_repo,
        stats_repo,
    ));

    // Build application state
    let request_stats = Arc::new(RequestStats::new());
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

    let state = AppState {
        config: config.clone(),
        pool: pool.clone(),
        cache,
        news_service,
        category_service,
        tag_service,
        stats_service,
        seed_loader,
        rate_limiter: rate_limiter.clone(),
        request_stats,
    };

    // Start rate limiter cleanup task (runs every 5 minutes)
    {
        let limiter = rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
