use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Storage
    pub upload_dir: String,
    pub output_dir: String,
    pub max_upload_bytes: usize,
    // TTS providers
    pub default_tts_provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_voice: String,
    pub aws_region: String,
    pub polly_voice: String,
    pub tts_cache_enabled: bool,
    // Conversion pipeline
    pub max_chunk_size: usize,
    pub chapter_pause_seconds: f32,
    // Content filtering
    pub filter: FilterConfig,
}

/// Toggles for the content-filter categories
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    pub skip_toc: bool,
    pub skip_acknowledgments: bool,
    pub skip_copyright: bool,
    pub skip_index: bool,
    pub skip_promotional: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_toc: true,
            skip_acknowledgments: true,
            skip_copyright: true,
            skip_index: true,
            skip_promotional: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (100 * 1024 * 1024).to_string())
                .parse()?,
            default_tts_provider: env::var("DEFAULT_TTS_PROVIDER")
                .unwrap_or_else(|_| "openai".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "tts-1-hd".to_string()),
            openai_voice: env::var("OPENAI_VOICE").unwrap_or_else(|_| "alloy".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            polly_voice: env::var("POLLY_VOICE").unwrap_or_else(|_| "Joanna".to_string()),
            tts_cache_enabled: env::var("TTS_CACHE_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<String>()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            max_chunk_size: env::var("MAX_CHUNK_SIZE")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()?,
            chapter_pause_seconds: env::var("CHAPTER_PAUSE_SECONDS")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse()?,
            filter: FilterConfig {
                skip_toc: env_flag("SKIP_TOC", true),
                skip_acknowledgments: env_flag("SKIP_ACKNOWLEDGMENTS", true),
                skip_copyright: env_flag("SKIP_COPYRIGHT", true),
                skip_index: env_flag("SKIP_INDEX", true),
                skip_promotional: env_flag("SKIP_PROMOTIONAL", true),
            },
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| s.to_lowercase() == "true")
        .unwrap_or(default)
}
