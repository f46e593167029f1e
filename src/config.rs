//! Configuration management for the dispatch bot
//!
//! Everything is read from the environment once at startup. Secrets are
//! required; every other option has a default, and a malformed value falls
//! back to that default with a warning.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::extraction::RetryPolicy;
use crate::ocr::OcrProvider;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub model: ModelConfig,
    pub acquisition: AcquisitionConfig,
    pub ocr: OcrConfig,
    pub server: ServerConfig,
    /// Directory for scoped attachment copies
    pub temp_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

/// Thresholds for text acquisition and the content gate
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Text-layer length below which a PDF is treated as scanned
    pub min_text_chars: usize,
    /// Acquired-text length below which the model is not called
    pub min_viable_chars: usize,
    /// Upscaling factor for page rasterization
    pub raster_scale: f32,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub language: String,
    pub providers: Vec<OcrProvider>,
    pub ollama_url: String,
    pub ollama_model: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        AcquisitionConfig {
            min_text_chars: 100,
            min_viable_chars: 50,
            raster_scale: 2.0,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            language: "eng".to_string(),
            providers: vec![OcrProvider::Tesseract],
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            telegram: TelegramConfig {
                bot_token: String::new(),
            },
            model: ModelConfig::default(),
            acquisition: AcquisitionConfig::default(),
            ocr: OcrConfig::default(),
            server: ServerConfig { port: 10000 },
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let env = Lookup(&lookup);

        let retry_defaults = defaults.model.retry.clone();
        let retry = RetryPolicy {
            max_retries: env.parse_or("MODEL_MAX_RETRIES", retry_defaults.max_retries),
            base_delay_ms: env.parse_or("MODEL_RETRY_BASE_MS", retry_defaults.base_delay_ms),
            ..retry_defaults
        };

        let providers = match env.get("OCR_PROVIDERS") {
            Some(list) => parse_providers(&list)?,
            None => defaults.ocr.providers,
        };

        Ok(Config {
            telegram: TelegramConfig {
                bot_token: env.require("TELEGRAM_BOT_TOKEN")?,
            },
            model: ModelConfig {
                api_key: env.require("OPENAI_API_KEY")?,
                model: env.get("OPENAI_MODEL").unwrap_or(defaults.model.model),
                base_url: env
                    .get("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.model.base_url),
                temperature: env.finite_or("OPENAI_TEMPERATURE", defaults.model.temperature),
                timeout_secs: env.parse_or("MODEL_TIMEOUT_SECS", defaults.model.timeout_secs),
                retry,
            },
            acquisition: AcquisitionConfig {
                min_text_chars: env
                    .parse_or("MIN_TEXT_CHARS", defaults.acquisition.min_text_chars),
                min_viable_chars: env
                    .parse_or("MIN_VIABLE_CHARS", defaults.acquisition.min_viable_chars),
                raster_scale: env
                    .finite_or("RASTER_SCALE", defaults.acquisition.raster_scale)
                    .clamp(0.5, 4.0),
            },
            ocr: OcrConfig {
                language: env.get("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                providers,
                ollama_url: env.get("OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url),
                ollama_model: env.get("OLLAMA_MODEL").unwrap_or(defaults.ocr.ollama_model),
            },
            server: ServerConfig {
                port: env.parse_or("PORT", defaults.server.port),
            },
            temp_dir: env
                .get("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
        })
    }
}

struct Lookup<'a, F>(&'a F);

impl<F> Lookup<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-empty value for `key`
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T: FromStr + Copy>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring malformed {}={:?}, using default", key, raw);
                default
            }),
            None => default,
        }
    }

    /// Like `parse_or`, but `NaN` and infinities count as malformed
    fn finite_or(&self, key: &str, default: f32) -> f32 {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.parse::<f32>().ok().filter(|v| v.is_finite()) {
            Some(value) => value,
            None => {
                tracing::warn!("Ignoring malformed {}={:?}, using default", key, raw);
                default
            }
        }
    }
}

fn parse_providers(list: &str) -> Result<Vec<OcrProvider>, ConfigError> {
    let providers = list
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            name.parse::<OcrProvider>()
                .map_err(|_| ConfigError::Invalid("OCR_PROVIDERS", name.trim().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if providers.is_empty() {
        return Err(ConfigError::Invalid("OCR_PROVIDERS", list.to_string()));
    }
    Ok(providers)
}
