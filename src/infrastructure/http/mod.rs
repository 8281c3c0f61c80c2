pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::controllers::{health, profile::ProfileController, tts::TtsController};
use crate::infrastructure::config::Config;
use crate::infrastructure::transcoder::Transcoder;

/// Build the application router with every route and layer configured
pub fn build_router(
    config: &Config,
    transcoder: Arc<dyn Transcoder>,
    tts_controller: Arc<TtsController>,
    profile_controller: Arc<ProfileController>,
) -> Router {
    let tts_routes = Router::new()
        .route("/tts/synthesize", post(TtsController::synthesize))
        .with_state(tts_controller);

    let profile_routes = Router::new()
        .route("/voice-profiles/upload", post(ProfileController::upload))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(profile_controller);

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(transcoder);

    // Published artifacts, read-only
    let static_routes = Router::new()
        .nest_service("/generated", ServeDir::new(&config.output_dir))
        .nest_service("/profiles", ServeDir::new(&config.profiles_dir));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health_routes)
        .merge(tts_routes)
        .merge(profile_routes)
        .merge(static_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(cors),
        )
}

/// Start the HTTP server
pub async fn start_http_server(config: Arc<Config>, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
