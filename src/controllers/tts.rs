use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::tts::{ServiceInfo, TtsManager};

/// Response for GET /api/services
#[derive(Debug, Serialize, Deserialize)]
pub struct ServicesResponse {
    pub services: Vec<ServiceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
}

pub struct TtsController {
    tts_manager: Arc<TtsManager>,
}

impl TtsController {
    pub fn new(tts_manager: Arc<TtsManager>) -> Self {
        Self { tts_manager }
    }

    /// GET /api/services - Available TTS providers and their voices
    pub async fn services(
        State(controller): State<Arc<TtsController>>,
    ) -> Json<ServicesResponse> {
        Json(ServicesResponse {
            services: controller.tts_manager.catalog(),
            default_provider: controller.tts_manager.default_provider().map(str::to_string),
        })
    }
}
