use axum::http::{HeaderName, HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lesson_progress_server::{open_database, progress, routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lesson_progress_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lesson Progress Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    let db = open_database(&config.database_path)?;

    // Bring the leaderboard in line with whatever is on disk
    let summary = {
        let db = db.clone();
        tokio::task::spawn_blocking(move || progress::recompute_leaderboard(&db)).await??
    };
    tracing::info!(
        "Leaderboard ready: {} learners, {} rows refreshed",
        summary.learners,
        summary.rows_written
    );

    // Configure CORS
    let origins = config
        .allowed_origins
        .iter()
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static(routes::identity::HEADER_EMAIL),
            HeaderName::from_static(routes::identity::HEADER_NAME),
            HeaderName::from_static(routes::identity::HEADER_ROLE),
            HeaderName::from_static(routes::identity::HEADER_TIMESTAMP),
            HeaderName::from_static(routes::identity::HEADER_SIGNATURE),
        ]);

    let log_requests = config.log_requests;
    let state = AppState::new(db, config.clone());

    let mut app = routes::router(state).layer(cors);
    if log_requests {
        app = app.layer(TraceLayer::new_for_http());
    }

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
