use super::error::ProfileServiceError;
use super::model::VoiceProfile;
use crate::infrastructure::repositories::ProfileRepository;
use crate::infrastructure::scratch::{persist, ScratchFiles};
use crate::infrastructure::transcoder::Transcoder;
use async_trait::async_trait;
use std::sync::Arc;

pub struct ProfileService {
    profile_repo: Arc<ProfileRepository>,
    transcoder: Arc<dyn Transcoder>,
}

impl ProfileService {
    pub fn new(profile_repo: Arc<ProfileRepository>, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            profile_repo,
            transcoder,
        }
    }
}

#[async_trait]
pub trait ProfileServiceApi: Send + Sync {
    /// Store an uploaded voice sample as the user's canonical reference
    ///
    /// This operation:
    /// - Saves the raw upload next to the user's profile
    /// - Converts it to mono / 24 kHz / 16-bit PCM with the transcoder
    /// - Replaces any previous canonical file for the user
    /// - Removes the raw upload whatever the outcome
    async fn ingest(
        &self,
        user_id: &str,
        upload: &[u8],
        file_name: Option<&str>,
    ) -> Result<VoiceProfile, ProfileServiceError>;

    /// Look up the canonical reference of a user
    async fn find(&self, user_id: &str) -> Result<Option<VoiceProfile>, ProfileServiceError>;
}

#[async_trait]
impl ProfileServiceApi for ProfileService {
    async fn ingest(
        &self,
        user_id: &str,
        upload: &[u8],
        file_name: Option<&str>,
    ) -> Result<VoiceProfile, ProfileServiceError> {
        let user_id =
            ProfileRepository::normalize_user_id(user_id).map_err(ProfileServiceError::InvalidArgument)?;
        let extension = ProfileRepository::upload_extension(file_name);

        tracing::info!(
            user_id = %user_id,
            upload_size = upload.len(),
            extension = %extension,
            "Voice profile upload"
        );

        tokio::fs::create_dir_all(self.profile_repo.user_dir(&user_id))
            .await
            .map_err(|e| ProfileServiceError::UploadFailed(e.to_string()))?;

        let mut scratch = ScratchFiles::new();

        // 1. Persist the raw upload
        let raw_path = scratch.track(self.profile_repo.raw_upload_path(&user_id, &extension));
        tokio::fs::write(&raw_path, upload)
            .await
            .map_err(|e| ProfileServiceError::UploadFailed(e.to_string()))?;

        // 2. Convert in the work area, then swap the result in
        let pending_path = scratch.track(self.profile_repo.pending_canonical_path(&user_id));
        self.transcoder
            .convert_to_canonical(&raw_path, &pending_path)
            .await?;

        let canonical_path = self.profile_repo.canonical_path(&user_id);
        persist(&pending_path, &canonical_path)
            .await
            .map_err(|e| ProfileServiceError::Storage(e.to_string()))?;

        tracing::info!(
            user_id = %user_id,
            path = %canonical_path.display(),
            "Voice profile stored"
        );

        Ok(VoiceProfile {
            locator: self.profile_repo.locator(&user_id),
            user_id,
            reference_wav: canonical_path,
        })
    }

    async fn find(&self, user_id: &str) -> Result<Option<VoiceProfile>, ProfileServiceError> {
        let user_id =
            ProfileRepository::normalize_user_id(user_id).map_err(ProfileServiceError::InvalidArgument)?;
        self.profile_repo
            .find(&user_id)
            .await
            .map_err(|e| ProfileServiceError::Storage(e.to_string()))
    }
}
