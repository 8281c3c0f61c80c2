pub mod ffmpeg;

pub use ffmpeg::FfmpegTranscoder;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reference and output audio: mono, 24 kHz, signed 16-bit little endian PCM
pub const CANONICAL_SAMPLE_RATE: u32 = 24_000;
pub const CANONICAL_CHANNELS: u16 = 1;
pub const CANONICAL_CODEC: &str = "pcm_s16le";

#[derive(Debug, thiserror::Error)]
pub enum TranscoderError {
    /// The program cannot be found on this host
    #[error("{0}")]
    Unavailable(String),
    /// The program ran and exited non-zero; carries a bounded stderr excerpt
    #[error("{0}")]
    Failed(String),
    #[error("transcoder i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// External media converter.
///
/// Each operation locates the program once and fails with
/// [`TranscoderError::Unavailable`] if it is missing; nothing is retried.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Resolve the program without running a conversion
    fn ensure_available(&self) -> Result<PathBuf, TranscoderError>;

    /// Resample `input` to the canonical format at `output`
    async fn convert_to_canonical(&self, input: &Path, output: &Path) -> Result<(), TranscoderError>;

    /// Join same-format `inputs`, in order, into `output`.
    ///
    /// The ordered file list is written to `manifest`; the caller owns that
    /// path and removes it afterwards.
    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        manifest: &Path,
        output: &Path,
    ) -> Result<(), TranscoderError>;
}
