use crate::error::AppError;
use crate::infrastructure::transcoder::TranscoderError;

#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("failed to save upload: {0}")]
    UploadFailed(String),
    #[error("{0}")]
    TranscoderUnavailable(String),
    #[error("ffmpeg convert failed: {0}")]
    TranscoderFailed(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TranscoderError> for ProfileServiceError {
    fn from(err: TranscoderError) -> Self {
        match err {
            TranscoderError::Unavailable(msg) => ProfileServiceError::TranscoderUnavailable(msg),
            TranscoderError::Failed(excerpt) => ProfileServiceError::TranscoderFailed(excerpt),
            TranscoderError::Io(e) => ProfileServiceError::Storage(e.to_string()),
        }
    }
}

impl From<ProfileServiceError> for AppError {
    fn from(err: ProfileServiceError) -> Self {
        let message = err.to_string();
        match err {
            ProfileServiceError::InvalidArgument(_) => AppError::bad_request("INVALID_ARGUMENT", message),
            ProfileServiceError::UploadFailed(_) => AppError::bad_request("UPLOAD_FAILED", message),
            // The upload itself could not be decoded
            ProfileServiceError::TranscoderFailed(_) => AppError::bad_request("TRANSCODER_FAILED", message),
            ProfileServiceError::TranscoderUnavailable(_) => {
                AppError::dependency("TRANSCODER_UNAVAILABLE", message)
            }
            ProfileServiceError::Storage(_) => AppError::dependency("STORAGE_ERROR", message),
            ProfileServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
