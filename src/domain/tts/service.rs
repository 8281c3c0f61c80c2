use super::error::TtsServiceError;
use super::planner::{plan_chunks, Chunk};
use super::segmenter::split_sentences;
use super::SynthesizeRequest;
use crate::domain::profile::VoiceProfile;
use crate::infrastructure::engines::{EngineInput, EngineRegistry, SpeechEngine};
use crate::infrastructure::repositories::{ArtifactRepository, OutputArtifact, ProfileRepository};
use crate::infrastructure::scratch::{persist, ScratchFiles};
use crate::infrastructure::transcoder::Transcoder;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TtsSynthesisResult {
    pub artifact_id: String,
    pub path: PathBuf,
    pub audio_url: String,
    pub sentence_count: usize,
    pub chunk_count: usize,
}

pub struct TtsService {
    registry: Arc<EngineRegistry>,
    profile_repo: Arc<ProfileRepository>,
    artifact_repo: Arc<ArtifactRepository>,
    transcoder: Arc<dyn Transcoder>,
    sentences_per_chunk: usize,
}

impl TtsService {
    pub fn new(
        registry: Arc<EngineRegistry>,
        profile_repo: Arc<ProfileRepository>,
        artifact_repo: Arc<ArtifactRepository>,
        transcoder: Arc<dyn Transcoder>,
        sentences_per_chunk: usize,
    ) -> Self {
        Self {
            registry,
            profile_repo,
            artifact_repo,
            transcoder,
            sentences_per_chunk,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text of any length into one audio file
    ///
    /// This operation:
    /// - Validates the text, the engine and the caller's reference voice
    /// - Splits the text into sentences and groups them into chunks
    /// - Runs the engine once per chunk, in order, stopping at the first failure
    /// - Copies a single part verbatim or concatenates several with the transcoder
    /// - Removes every per-chunk file and manifest before returning
    ///
    /// Returns the published artifact; nothing is published on failure
    async fn synthesize(&self, request: SynthesizeRequest) -> Result<TtsSynthesisResult, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: SynthesizeRequest) -> Result<TtsSynthesisResult, TtsServiceError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            engine = %request.engine,
            language = %request.language,
            user_id = ?request.user_id,
            text_length = request.text.len(),
            "TTS synthesis request"
        );

        // 1. Validate
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TtsServiceError::EmptyInput);
        }

        let engine = self.registry.get(&request.engine).await?;

        let profile = if engine.requires_reference_voice() {
            Some(
                self.find_reference_voice(&request.engine, request.user_id.as_deref())
                    .await?,
            )
        } else {
            None
        };

        // 2. Segment & plan
        let sentences = split_sentences(text);
        let chunks = plan_chunks(&sentences, self.sentences_per_chunk);
        if chunks.is_empty() {
            return Err(TtsServiceError::NoValidSentences);
        }

        tracing::info!(
            sentence_count = sentences.len(),
            chunk_count = chunks.len(),
            sentences_per_chunk = self.sentences_per_chunk,
            "Text split into chunks"
        );

        // 3-5. Synthesize, merge into the work area; scratch files go away when `scratch` drops
        let mut scratch = ScratchFiles::new();
        let artifact = self.artifact_repo.allocate();
        let staged = scratch.track(self.artifact_repo.staging_path(&artifact));

        let reference_wav = profile.as_ref().map(|p| p.reference_wav.as_path());
        let parts = self
            .synthesize_chunks(engine.as_ref(), &chunks, reference_wav, &request.language, &artifact, &mut scratch)
            .await?;
        self.merge_parts(&parts, &staged, &artifact, &mut scratch).await?;

        // 6. Publish
        persist(&staged, &artifact.path)
            .await
            .map_err(|e| TtsServiceError::Storage(e.to_string()))?;

        let audio_url = self.artifact_repo.locator(&artifact);
        tracing::info!(
            engine = %request.engine,
            audio_url = %audio_url,
            chunk_count = chunks.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "TTS synthesis completed"
        );

        Ok(TtsSynthesisResult {
            artifact_id: artifact.id,
            path: artifact.path,
            audio_url,
            sentence_count: sentences.len(),
            chunk_count: chunks.len(),
        })
    }
}

impl TtsService {
    async fn find_reference_voice(
        &self,
        engine_id: &str,
        user_id: Option<&str>,
    ) -> Result<VoiceProfile, TtsServiceError> {
        let user_id = match user_id.map(str::trim) {
            Some(user_id) if !user_id.is_empty() => user_id,
            _ => {
                return Err(TtsServiceError::MissingReferenceVoice(format!(
                    "{} requires userId",
                    engine_id
                )))
            }
        };

        let user_id =
            ProfileRepository::normalize_user_id(user_id).map_err(TtsServiceError::InvalidArgument)?;

        self.profile_repo
            .find(&user_id)
            .await
            .map_err(|e| TtsServiceError::Storage(e.to_string()))?
            .ok_or_else(|| {
                TtsServiceError::MissingReferenceVoice(format!(
                    "speaker_wav not found for userId={}",
                    user_id
                ))
            })
    }

    /// Run the engine for every chunk in order, one intermediate file each
    async fn synthesize_chunks(
        &self,
        engine: &dyn SpeechEngine,
        chunks: &[Chunk],
        reference_wav: Option<&Path>,
        language: &str,
        artifact: &OutputArtifact,
        scratch: &mut ScratchFiles,
    ) -> Result<Vec<PathBuf>, TtsServiceError> {
        let mut parts = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let text = chunk.text();
            let part = scratch.track(self.artifact_repo.intermediate_path(artifact, chunk.index));

            tracing::info!(
                chunk_index = chunk.index,
                chunk_sentences = chunk.sentences.len(),
                chunk_length = text.len(),
                "Synthesizing chunk"
            );

            let input = EngineInput {
                text: &text,
                reference_wav,
                language,
            };
            engine
                .synthesize_to_file(input, &part)
                .await
                .map_err(|message| {
                    tracing::error!(chunk_index = chunk.index, error = %message, "Engine synthesis failed");
                    TtsServiceError::EngineSynthesisFailed {
                        chunk: chunk.index,
                        message,
                    }
                })?;

            let produced = tokio::fs::try_exists(&part).await.unwrap_or(false);
            if !produced {
                return Err(TtsServiceError::EngineSynthesisFailed {
                    chunk: chunk.index,
                    message: "engine reported success but wrote no audio".to_string(),
                });
            }

            parts.push(part);
        }

        Ok(parts)
    }

    /// Produce the merged audio at `output` from the ordered parts
    async fn merge_parts(
        &self,
        parts: &[PathBuf],
        output: &Path,
        artifact: &OutputArtifact,
        scratch: &mut ScratchFiles,
    ) -> Result<(), TtsServiceError> {
        if let [single] = parts {
            tracing::debug!("Single chunk, copying part verbatim");
            tokio::fs::copy(single, output)
                .await
                .map_err(|e| TtsServiceError::Storage(e.to_string()))?;
            return Ok(());
        }

        tracing::debug!(parts = parts.len(), "Merging parts with transcoder");
        let manifest = scratch.track(self.artifact_repo.manifest_path(artifact));
        self.transcoder
            .concatenate(parts, &manifest, output)
            .await?;
        Ok(())
    }
}
