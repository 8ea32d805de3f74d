use super::error::TtsServiceError;
use crate::infrastructure::repositories::{TtsRepository, VoiceInfo};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

const MIN_SPEED: f32 = 0.5;
const MAX_SPEED: f32 = 2.0;

/// Catalog entry for GET /api/services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub default_voice: String,
    pub voices: Vec<VoiceInfo>,
}

/// Registry of TTS providers with a configured default.
///
/// Dispatches synthesis requests to the named provider, validates request
/// parameters and optionally caches synthesized audio per
/// (provider, voice, speed, text).
pub struct TtsManager {
    providers: HashMap<String, Arc<dyn TtsRepository>>,
    provider_order: Vec<String>,
    default_provider: Option<String>,
    cache: Option<Cache<String, Arc<Vec<u8>>>>,
}

impl TtsManager {
    pub fn new(cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self {
            providers: HashMap::new(),
            provider_order: Vec::new(),
            default_provider: None,
            cache,
        }
    }

    /// Register a provider. The first registered provider becomes the
    /// default until `set_default_provider` is called.
    pub fn add_provider(&mut self, repo: Arc<dyn TtsRepository>) {
        let name = repo.provider_name().to_string();
        if self.default_provider.is_none() {
            self.default_provider = Some(name.clone());
        }
        self.provider_order.push(name.clone());
        self.providers.insert(name, repo);
    }

    pub fn set_default_provider(&mut self, name: &str) -> Result<(), TtsServiceError> {
        if !self.providers.contains_key(name) {
            return Err(TtsServiceError::UnknownProvider(name.to_string()));
        }
        self.default_provider = Some(name.to_string());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn default_provider(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Configured providers and their voices, in registration order
    pub fn catalog(&self) -> Vec<ServiceInfo> {
        self.provider_order
            .iter()
            .filter_map(|name| self.providers.get(name))
            .map(|repo| ServiceInfo {
                name: repo.provider_name().to_string(),
                default_voice: repo.default_voice(),
                voices: repo.available_voices(),
            })
            .collect()
    }

    /// Synthesize text with the named (or default) provider
    pub async fn synthesize(
        &self,
        provider: Option<&str>,
        voice: Option<&str>,
        speed: f32,
        text: &str,
    ) -> Result<Vec<u8>, TtsServiceError> {
        if text.trim().is_empty() {
            return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(TtsServiceError::Invalid(format!(
                "Speed must be between {} and {}",
                MIN_SPEED, MAX_SPEED
            )));
        }

        let provider_name = provider
            .map(str::to_string)
            .or_else(|| self.default_provider.clone())
            .ok_or_else(|| {
                TtsServiceError::Dependency("No TTS provider configured".to_string())
            })?;

        let repo = self
            .providers
            .get(&provider_name)
            .ok_or_else(|| TtsServiceError::UnknownProvider(provider_name.clone()))?;

        let voice = match voice {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => repo.default_voice(),
        };

        let cache_key = cache_key(&provider_name, &voice, speed, text);
        if let Some(cache) = &self.cache {
            if let Some(audio) = cache.get(&cache_key).await {
                tracing::debug!(
                    provider = %provider_name,
                    voice = %voice,
                    audio_size = audio.len(),
                    "TTS cache hit"
                );
                return Ok(audio.as_ref().clone());
            }
        }

        let audio = repo
            .synthesize(text, &voice, speed)
            .await
            .map_err(TtsServiceError::Dependency)?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, Arc::new(audio.clone())).await;
        }

        Ok(audio)
    }
}

fn cache_key(provider: &str, voice: &str, speed: f32, text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("{}:{}:{}:{:x}", provider, voice, speed, hasher.finish())
}
