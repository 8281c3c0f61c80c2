use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ai_voice_backend::controllers::{profile::ProfileController, tts::TtsController};
use ai_voice_backend::domain::{profile::ProfileService, tts::TtsService};
use ai_voice_backend::infrastructure::config::{Config, LogFormat};
use ai_voice_backend::infrastructure::engines::{CoquiTtsLoader, EngineRegistry};
use ai_voice_backend::infrastructure::http::{build_router, start_http_server};
use ai_voice_backend::infrastructure::repositories::{ArtifactRepository, ProfileRepository};
use ai_voice_backend::infrastructure::transcoder::{FfmpegTranscoder, Transcoder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting AI Voice Backend on {}:{}",
        config.host,
        config.port
    );

    config.ensure_directories()?;
    tracing::info!(
        profiles_dir = %config.profiles_dir.display(),
        output_dir = %config.output_dir.display(),
        work_dir = %config.work_dir.display(),
        "Storage directories ready"
    );

    // Transcoder presence is checked per call; warn early so operators notice
    let transcoder: Arc<dyn Transcoder> = Arc::new(FfmpegTranscoder::new(config.ffmpeg_path.clone()));
    match transcoder.ensure_available() {
        Ok(path) => tracing::info!(ffmpeg = %path.display(), "ffmpeg located"),
        Err(e) => tracing::warn!(error = %e, "ffmpeg not available; uploads and multi-chunk synthesis will fail"),
    }

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Engines (loaded lazily on first request)
    let registry = Arc::new(
        EngineRegistry::new()
            .with_engine(
                "xtts",
                Arc::new(CoquiTtsLoader::new(config.tts_python.clone(), config.xtts_model.clone())),
            )
            .with_disabled("kss", "the 'kss' engine is disabled in this build; use 'xtts'"),
    );

    // 2. Repositories
    let profile_repo = Arc::new(ProfileRepository::new(
        config.profiles_dir.clone(),
        config.work_dir.clone(),
    ));
    let artifact_repo = Arc::new(ArtifactRepository::new(
        config.output_dir.clone(),
        config.work_dir.clone(),
    ));

    // 3. Services
    let tts_service = Arc::new(TtsService::new(
        registry,
        profile_repo.clone(),
        artifact_repo,
        transcoder.clone(),
        config.sentences_per_chunk,
    ));
    let profile_service = Arc::new(ProfileService::new(profile_repo, transcoder.clone()));

    // 4. Controllers
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let profile_controller = Arc::new(ProfileController::new(profile_service));

    let app = build_router(&config, transcoder, tts_controller, profile_controller);

    start_http_server(Arc::new(config), app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ai_voice_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
