use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::tts::{SynthesizeRequest, SynthesizeResponse, TtsService, TtsServiceApi},
    error::AppResult,
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /tts/synthesize - Convert text to speech with the caller's cloned voice
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<SynthesizeRequest>, JsonRejection>,
    ) -> AppResult<Json<SynthesizeResponse>> {
        let Json(request) = payload?;
        let result = controller.tts_service.synthesize(request).await?;
        Ok(Json(result.into()))
    }
}
