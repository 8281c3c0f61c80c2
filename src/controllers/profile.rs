use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;

use crate::{
    domain::profile::{ProfileService, ProfileServiceApi, ProfileUploadResponse},
    error::{AppError, AppResult},
};

pub struct ProfileController {
    profile_service: Arc<ProfileService>,
}

/// Parts of the upload form we care about
#[derive(Default)]
struct UploadForm {
    user_id: Option<String>,
    file_name: Option<String>,
    file: Option<Vec<u8>>,
}

impl ProfileController {
    pub fn new(profile_service: Arc<ProfileService>) -> Self {
        Self { profile_service }
    }

    /// POST /voice-profiles/upload - Store a voice sample (any format) as the
    /// user's canonical reference
    pub async fn upload(
        State(controller): State<Arc<ProfileController>>,
        multipart: Multipart,
    ) -> AppResult<Json<ProfileUploadResponse>> {
        let form = Self::read_form(multipart).await?;

        let user_id = form
            .user_id
            .ok_or_else(|| AppError::bad_request("INVALID_ARGUMENT", "userId required"))?;
        let file = form
            .file
            .ok_or_else(|| AppError::bad_request("INVALID_ARGUMENT", "file required"))?;

        let profile = controller
            .profile_service
            .ingest(&user_id, &file, form.file_name.as_deref())
            .await?;

        Ok(Json(profile.into()))
    }

    async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "userId" => form.user_id = Some(field.text().await?),
                "file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    form.file = Some(field.bytes().await?.to_vec());
                }
                _ => {}
            }
        }

        Ok(form)
    }
}
