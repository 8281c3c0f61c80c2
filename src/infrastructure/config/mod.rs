use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::domain::tts::DEFAULT_SENTENCES_PER_CHUNK;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    // Storage
    pub profiles_dir: PathBuf,
    pub output_dir: PathBuf,
    pub work_dir: PathBuf,
    // External programs
    pub ffmpeg_path: PathBuf,
    pub tts_python: PathBuf,
    pub xtts_model: String,
    // Pipeline tuning
    pub sentences_per_chunk: usize,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let output_dir = PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "generated".to_string()));
        let work_dir = PathBuf::from(env::var("WORK_DIR").unwrap_or_else(|_| "work".to_string()));

        let sentences_per_chunk: usize = env::var("SENTENCES_PER_CHUNK")
            .unwrap_or_else(|_| DEFAULT_SENTENCES_PER_CHUNK.to_string())
            .parse()?;
        if sentences_per_chunk == 0 {
            return Err("SENTENCES_PER_CHUNK must be at least 1".into());
        }

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            profiles_dir: PathBuf::from(env::var("PROFILES_DIR").unwrap_or_else(|_| "profiles".to_string())),
            output_dir,
            work_dir,
            ffmpeg_path: PathBuf::from(env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string())),
            tts_python: PathBuf::from(env::var("TTS_PYTHON").unwrap_or_else(|_| "python3".to_string())),
            xtts_model: env::var("XTTS_MODEL")
                .unwrap_or_else(|_| "tts_models/multilingual/multi-dataset/xtts_v2".to_string()),
            sentences_per_chunk,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
                .parse()?,
        };

        Ok(config)
    }

    /// Create every storage directory the service writes into
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [&self.profiles_dir, &self.output_dir, &self.work_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
