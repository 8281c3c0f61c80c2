use serde::{Deserialize, Serialize};

/// Request for POST /tts/synthesize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

fn default_engine() -> String {
    "xtts".to_string()
}

fn default_language() -> String {
    "ko".to_string()
}

/// Response for POST /tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeResponse {
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
    pub chunks: usize,
    pub sentences: usize,
}
