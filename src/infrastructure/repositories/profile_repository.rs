use crate::domain::profile::VoiceProfile;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const CANONICAL_FILE_NAME: &str = "user_clean.wav";
const FALLBACK_EXTENSION: &str = ".bin";

/// Filesystem layout of per-user voice profiles.
///
/// `<root>/<user_id>/user_clean.wav` holds the canonical reference. Raw uploads
/// and in-progress conversions get unique names in the private work directory.
pub struct ProfileRepository {
    root: PathBuf,
    work_dir: PathBuf,
    public_prefix: String,
}

impl ProfileRepository {
    pub fn new(root: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            work_dir: work_dir.into(),
            public_prefix: "/profiles".to_string(),
        }
    }

    /// Trim and validate a user id so it is safe to use as a directory name
    pub fn normalize_user_id(user_id: &str) -> Result<String, String> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err("userId required".to_string());
        }
        if user_id == "." || user_id == ".." {
            return Err(format!("invalid userId: {}", user_id));
        }
        if !user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(format!(
                "invalid userId: {} (allowed: letters, digits, '-', '_', '.')",
                user_id
            ));
        }
        Ok(user_id.to_string())
    }

    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join(user_id)
    }

    pub fn canonical_path(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join(CANONICAL_FILE_NAME)
    }

    /// Unique location for the raw bytes of an upload
    pub fn raw_upload_path(&self, user_id: &str, extension: &str) -> PathBuf {
        self.work_dir
            .join(format!("{}_raw_{}{}", user_id, Uuid::new_v4().simple(), extension))
    }

    /// Unique location the transcoder writes to before the result replaces the
    /// canonical file. Keeps the `.wav` suffix so the output format is implied.
    pub fn pending_canonical_path(&self, user_id: &str) -> PathBuf {
        self.work_dir
            .join(format!("{}_pending_{}.wav", user_id, Uuid::new_v4().simple()))
    }

    pub fn locator(&self, user_id: &str) -> String {
        format!("{}/{}/{}", self.public_prefix, user_id, CANONICAL_FILE_NAME)
    }

    /// Load the profile of `user_id` if a canonical reference exists
    pub async fn find(&self, user_id: &str) -> std::io::Result<Option<VoiceProfile>> {
        let reference_wav = self.canonical_path(user_id);
        if tokio::fs::try_exists(&reference_wav).await? {
            Ok(Some(VoiceProfile {
                user_id: user_id.to_string(),
                reference_wav,
                locator: self.locator(user_id),
            }))
        } else {
            Ok(None)
        }
    }

    /// Lowercased extension of the uploaded file name, `.bin` when absent or odd
    pub fn upload_extension(file_name: Option<&str>) -> String {
        file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
    }
}
