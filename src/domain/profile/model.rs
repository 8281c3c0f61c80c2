use std::path::PathBuf;

/// A user's canonical reference waveform (mono, 24 kHz, 16-bit PCM)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub user_id: String,
    pub reference_wav: PathBuf,
    /// Public URL path the file is served under
    pub locator: String,
}
