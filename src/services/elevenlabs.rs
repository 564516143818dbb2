//! ElevenLabs text-to-speech client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::services::ProviderError;
use crate::types::VoiceSpeed;

// Default voice: Rachel.
const VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const MODEL_ID: &str = "eleven_monolingual_v1";
const TIMEOUT: Duration = Duration::from_secs(30);

/// Speed maps onto the voice-settings pair `(stability, similarity_boost)`;
/// ElevenLabs has no direct rate control.
fn voice_settings(speed: VoiceSpeed) -> (f64, f64) {
    match speed {
        VoiceSpeed::Slow => (0.75, 0.75),
        VoiceSpeed::Fast => (0.50, 0.85),
        VoiceSpeed::Normal => (0.65, 0.80),
    }
}

/// Synthesizes `text` and returns the MP3 payload base64-encoded.
pub async fn synthesize(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    text: &str,
    speed: VoiceSpeed,
) -> Result<String, ProviderError> {
    let (stability, similarity_boost) = voice_settings(speed);
    let url = format!("{base_url}/v1/text-to-speech/{VOICE_ID}");

    let payload = json!({
        "text": text,
        "model_id": MODEL_ID,
        "voice_settings": {
            "stability": stability,
            "similarity_boost": similarity_boost,
        }
    });

    let response = client
        .post(&url)
        .header("Accept", "audio/mpeg")
        .header("xi-api-key", api_key)
        .json(&payload)
        .timeout(TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus { status, body });
    }

    let audio = response.bytes().await?;
    Ok(STANDARD.encode(&audio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_maps_to_voice_settings() {
        assert_eq!(voice_settings(VoiceSpeed::Slow), (0.75, 0.75));
        assert_eq!(voice_settings(VoiceSpeed::Normal), (0.65, 0.80));
        assert_eq!(voice_settings(VoiceSpeed::Fast), (0.50, 0.85));
    }
}
