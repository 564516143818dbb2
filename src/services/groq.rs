//! Groq chat-completions used as a translation oracle, plus the documented
//! TTS placeholder (Groq exposes no TTS API).

use std::time::Duration;

use serde_json::json;

use crate::services::ProviderError;
use crate::types::VoiceSpeed;

const MODEL: &str = "llama3-70b-8192";
const MAX_TOKENS: u32 = 1000;
// Low temperature keeps translations close to deterministic.
const TEMPERATURE: f64 = 0.1;
const TIMEOUT: Duration = Duration::from_secs(30);

fn language_name(code: &str) -> &str {
    match code {
        "ko" => "Korean",
        "ja" => "Japanese",
        "zh" => "Chinese",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "th" => "Thai",
        "vi" => "Vietnamese",
        other => other,
    }
}

fn build_prompt(text: &str, target_language: &str, source_language: &str) -> String {
    let target = language_name(target_language);
    if source_language == "auto" {
        format!(
            "Translate this text to {target}. Return only the {target} translation \
             without any additional text:\n\n{text}"
        )
    } else {
        let source = language_name(source_language);
        format!(
            "Translate this {source} text to {target}. Return only the {target} \
             translation without any additional text:\n\n{text}"
        )
    }
}

pub async fn translate(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    text: &str,
    target_language: &str,
    source_language: &str,
) -> Result<String, ProviderError> {
    let url = format!("{base_url}/openai/v1/chat/completions");
    let prompt = build_prompt(text, target_language, source_language);

    let payload = json!({
        "model": MODEL,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE,
    });

    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&payload)
        .timeout(TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus { status, body });
    }

    let body: serde_json::Value = response.json().await?;
    body.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ProviderError::Malformed)
}

/// Placeholder: Groq has no TTS endpoint, so this tier always declines. Kept
/// so the cascade can carry a `groq` TTS hint without special-casing it.
pub async fn synthesize(
    _client: &reqwest::Client,
    _base_url: &str,
    _api_key: &str,
    _text: &str,
    _speed: VoiceSpeed,
) -> Result<String, ProviderError> {
    Err(ProviderError::NoTtsCapability)
}
