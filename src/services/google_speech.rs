//! Google speech backends: the paid Cloud Text-to-Speech API (per-user key)
//! and the unauthenticated translate_tts proxy used as the universal
//! fallback.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::services::ProviderError;
use crate::types::VoiceSpeed;

const CLOUD_TIMEOUT: Duration = Duration::from_secs(30);
const PROXY_TIMEOUT: Duration = Duration::from_secs(15);

// Responses shorter than this are interstitial/error pages, not audio.
const MIN_PROXY_AUDIO_BYTES: usize = 1000;

const PROXY_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

fn speaking_rate(speed: VoiceSpeed) -> f64 {
    match speed {
        VoiceSpeed::Fast => 1.25,
        VoiceSpeed::Slow => 0.75,
        VoiceSpeed::Normal => 1.0,
    }
}

fn cloud_language_code(language: &str) -> &'static str {
    match language {
        "ko" => "ko-KR",
        "ja" => "ja-JP",
        "zh" => "zh-CN",
        "es" => "es-ES",
        "fr" => "fr-FR",
        "de" => "de-DE",
        "it" => "it-IT",
        "pt" => "pt-PT",
        "ru" => "ru-RU",
        "ar" => "ar-XA",
        "hi" => "hi-IN",
        "th" => "th-TH",
        "vi" => "vi-VN",
        _ => "en-US",
    }
}

fn cloud_voice_name(language_code: &str) -> String {
    match language_code {
        "en-US" => "en-US-Neural2-D".to_string(),
        "ko-KR" => "ko-KR-Neural2-A".to_string(),
        "ja-JP" => "ja-JP-Neural2-B".to_string(),
        other => format!("{other}-Standard-A"),
    }
}

/// Google Cloud TTS. The API key travels as a URL parameter, not a bearer
/// token. Returns base64 MP3 (the API already encodes it).
pub async fn synthesize_cloud(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    text: &str,
    speed: VoiceSpeed,
    language: &str,
) -> Result<String, ProviderError> {
    let language_code = cloud_language_code(language);
    let voice_name = cloud_voice_name(language_code);
    let url = format!("{base_url}/v1/text:synthesize");

    let payload = json!({
        "input": { "text": text },
        "voice": {
            "languageCode": language_code,
            "name": voice_name,
            "ssmlGender": "MALE",
        },
        "audioConfig": {
            "audioEncoding": "MP3",
            "speakingRate": speaking_rate(speed),
            "pitch": 0.0,
            "volumeGainDb": 0.0,
        }
    });

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&payload)
        .timeout(CLOUD_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus { status, body });
    }

    let body: serde_json::Value = response.json().await?;
    body.get("audioContent")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or(ProviderError::Malformed)
}

/// Free translate_tts proxy. No key; needs a browser User-Agent, and short
/// bodies are rejected as implausible audio.
pub async fn synthesize_proxy(
    client: &reqwest::Client,
    base_url: &str,
    text: &str,
    speed: VoiceSpeed,
    language: &str,
) -> Result<String, ProviderError> {
    let slow = if speed == VoiceSpeed::Slow { "1" } else { "0" };
    let url = format!("{base_url}/translate_tts");

    let response = client
        .get(&url)
        .query(&[
            ("ie", "UTF-8"),
            ("q", text),
            ("tl", language),
            ("client", "tw-ob"),
            ("slow", slow),
        ])
        .header(reqwest::header::USER_AGENT, PROXY_USER_AGENT)
        .timeout(PROXY_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus { status, body });
    }

    let audio = response.bytes().await?;
    if audio.len() < MIN_PROXY_AUDIO_BYTES {
        return Err(ProviderError::ShortAudio(audio.len()));
    }

    Ok(STANDARD.encode(&audio))
}
