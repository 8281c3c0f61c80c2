pub mod dto;
pub mod error;
pub mod planner;
pub mod segmenter;
pub mod service;

pub use dto::{SynthesizeRequest, SynthesizeResponse};
pub use error::TtsServiceError;
pub use planner::{plan_chunks, Chunk, DEFAULT_SENTENCES_PER_CHUNK};
pub use segmenter::split_sentences;
pub use service::{TtsService, TtsServiceApi, TtsSynthesisResult};

impl From<TtsSynthesisResult> for SynthesizeResponse {
    fn from(result: TtsSynthesisResult) -> Self {
        Self {
            audio_url: result.audio_url,
            chunks: result.chunk_count,
            sentences: result.sentence_count,
        }
    }
}
