pub mod error;
pub mod model;
pub mod service;

pub use error::ProfileServiceError;
pub use model::VoiceProfile;
pub use service::{ProfileService, ProfileServiceApi};

use serde::{Deserialize, Serialize};

/// Response for POST /voice-profiles/upload
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileUploadResponse {
    pub ok: bool,
    pub path: String,
}

impl From<VoiceProfile> for ProfileUploadResponse {
    fn from(profile: VoiceProfile) -> Self {
        Self {
            ok: true,
            path: profile.locator,
        }
    }
}
