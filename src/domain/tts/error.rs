use crate::error::AppError;
use crate::infrastructure::engines::RegistryError;
use crate::infrastructure::transcoder::TranscoderError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("text is empty")]
    EmptyInput,
    #[error("no valid sentences")]
    NoValidSentences,
    #[error("unknown engine: {0}")]
    UnsupportedEngine(String),
    #[error("{0}")]
    EngineDisabled(String),
    #[error("{0}")]
    EngineLoadFailed(String),
    #[error("{0}")]
    MissingReferenceVoice(String),
    #[error("synthesis failed on chunk {chunk}: {message}")]
    EngineSynthesisFailed { chunk: usize, message: String },
    #[error("{0}")]
    TranscoderUnavailable(String),
    #[error("ffmpeg failed while merging: {0}")]
    TranscoderFailed(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RegistryError> for TtsServiceError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Unsupported(engine) => TtsServiceError::UnsupportedEngine(engine),
            RegistryError::Disabled { .. } => TtsServiceError::EngineDisabled(err.to_string()),
            RegistryError::LoadFailed { .. } => TtsServiceError::EngineLoadFailed(err.to_string()),
        }
    }
}

impl From<TranscoderError> for TtsServiceError {
    fn from(err: TranscoderError) -> Self {
        match err {
            TranscoderError::Unavailable(msg) => TtsServiceError::TranscoderUnavailable(msg),
            TranscoderError::Failed(excerpt) => TtsServiceError::TranscoderFailed(excerpt),
            TranscoderError::Io(e) => TtsServiceError::Storage(e.to_string()),
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        let message = err.to_string();
        match err {
            TtsServiceError::InvalidArgument(_) => AppError::bad_request("INVALID_ARGUMENT", message),
            TtsServiceError::EmptyInput => AppError::bad_request("EMPTY_INPUT", message),
            TtsServiceError::NoValidSentences => AppError::bad_request("NO_VALID_SENTENCES", message),
            TtsServiceError::UnsupportedEngine(_) => AppError::bad_request("UNSUPPORTED_ENGINE", message),
            TtsServiceError::EngineDisabled(_) => AppError::bad_request("ENGINE_DISABLED", message),
            TtsServiceError::MissingReferenceVoice(_) => {
                AppError::bad_request("MISSING_REFERENCE_VOICE", message)
            }
            TtsServiceError::EngineLoadFailed(_) => AppError::dependency("ENGINE_LOAD_FAILED", message),
            TtsServiceError::EngineSynthesisFailed { .. } => {
                AppError::dependency("ENGINE_SYNTHESIS_FAILED", message)
            }
            TtsServiceError::TranscoderUnavailable(_) => {
                AppError::dependency("TRANSCODER_UNAVAILABLE", message)
            }
            TtsServiceError::TranscoderFailed(_) => AppError::dependency("TRANSCODER_FAILED", message),
            TtsServiceError::Storage(_) => AppError::dependency("STORAGE_ERROR", message),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
