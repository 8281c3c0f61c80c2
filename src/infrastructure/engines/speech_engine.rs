use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Inputs for one engine call
#[derive(Debug, Clone, Copy)]
pub struct EngineInput<'a> {
    pub text: &'a str,
    pub reference_wav: Option<&'a Path>,
    pub language: &'a str,
}

/// A loaded speaker-conditioned text-to-speech engine.
///
/// Handles are shared by every request for the same engine id, so
/// implementations must be usable concurrently.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether every call needs a reference waveform to clone
    fn requires_reference_voice(&self) -> bool;

    /// Synthesize `input` and write the waveform to `output`
    ///
    /// # Errors
    /// Returns a short diagnostic when the engine fails for any reason
    async fn synthesize_to_file(&self, input: EngineInput<'_>, output: &Path) -> Result<(), String>;
}

/// Produces an engine handle. Called at most once per engine id while the
/// result is cached; may be slow.
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn SpeechEngine>, String>;
}
