//! Kplanner server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use kplanner_api::{middleware::AppState, router as api_router};
use kplanner_common::Config;
use kplanner_core::{
    AdCampaignService, AdGroupService, AuthService, CompanyService, FilterService, KeywordService,
};
use kplanner_db::repositories::{
    AdCampaignRepository, AdGroupRepository, CompanyRepository, FilterRepository,
    KeywordRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kplanner=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting kplanner server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = kplanner_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    kplanner_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let company_repo = CompanyRepository::new(Arc::clone(&db));
    let ad_campaign_repo = AdCampaignRepository::new(Arc::clone(&db));
    let ad_group_repo = AdGroupRepository::new(Arc::clone(&db));
    let keyword_repo = KeywordRepository::new(Arc::clone(&db));
    let filter_repo = FilterRepository::new(Arc::clone(&db));

    // Initialize services
    let limits = config.limits.clone();
    let state = AppState {
        company_service: CompanyService::new(company_repo.clone(), limits.clone()),
        ad_campaign_service: AdCampaignService::new(
            ad_campaign_repo.clone(),
            company_repo.clone(),
            limits.clone(),
        ),
        ad_group_service: AdGroupService::new(
            ad_group_repo.clone(),
            ad_campaign_repo.clone(),
            limits.clone(),
        ),
        keyword_service: KeywordService::new(
            keyword_repo,
            company_repo.clone(),
            ad_campaign_repo.clone(),
            ad_group_repo.clone(),
            limits.clone(),
        ),
        filter_service: FilterService::new(
            filter_repo,
            company_repo,
            ad_campaign_repo,
            ad_group_repo,
            limits,
        ),
        auth_service: AuthService::new(config.auth.clone()),
    };

    if state.auth_service.dev_mode() {
        info!(
            demo_user = state.auth_service.demo_user_id(),
            "Dev mode enabled, all requests run as the demo user"
        );
    }

    // Build router
    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            kplanner_api::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
