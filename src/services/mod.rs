pub mod cascade;
pub mod dictionary;
pub mod elevenlabs;
pub mod google_speech;
pub mod google_translate;
pub mod groq;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response shape")]
    Malformed,
    #[error("audio payload too short ({0} bytes)")]
    ShortAudio(usize),
    #[error("provider has no TTS capability")]
    NoTtsCapability,
    #[error("missing API key")]
    MissingKey,
}

/// Base URLs for every downstream provider. Defaults are the live endpoints;
/// each can be overridden from the environment, which the tests use to point
/// providers at an unreachable address.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub elevenlabs: String,
    pub google_cloud_tts: String,
    pub google_translate_free: String,
    pub google_translate_official: String,
    pub google_tts_proxy: String,
    pub groq: String,
}

impl ProviderEndpoints {
    pub fn from_env() -> Self {
        Self {
            elevenlabs: env_endpoint("ELEVENLABS_API_ENDPOINT", "https://api.elevenlabs.io"),
            google_cloud_tts: env_endpoint(
                "GOOGLE_CLOUD_TTS_ENDPOINT",
                "https://texttospeech.googleapis.com",
            ),
            google_translate_free: env_endpoint(
                "GOOGLE_TRANSLATE_FREE_ENDPOINT",
                "https://translate.googleapis.com",
            ),
            google_translate_official: env_endpoint(
                "GOOGLE_TRANSLATE_API_ENDPOINT",
                "https://translation.googleapis.com",
            ),
            google_tts_proxy: env_endpoint(
                "GOOGLE_TTS_PROXY_ENDPOINT",
                "https://translate.google.com",
            ),
            groq: env_endpoint("GROQ_API_ENDPOINT", "https://api.groq.com"),
        }
    }

    /// All providers aimed at one base URL; test helper.
    pub fn all_pointing_at(base: &str) -> Self {
        Self {
            elevenlabs: base.to_string(),
            google_cloud_tts: base.to_string(),
            google_translate_free: base.to_string(),
            google_translate_official: base.to_string(),
            google_tts_proxy: base.to_string(),
            groq: base.to_string(),
        }
    }
}

fn env_endpoint(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Shared outbound HTTP client plus the resolved endpoint set. Individual
/// calls attach their own timeout, so no global client timeout is set here.
#[derive(Clone)]
pub struct Providers {
    client: reqwest::Client,
    endpoints: ProviderEndpoints,
}

impl Providers {
    pub fn new(endpoints: ProviderEndpoints) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, endpoints }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }
}
