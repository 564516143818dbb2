//! Google translation backends: the unauthenticated `translate_a/single`
//! endpoint (also used for language detection) and the official Translate v2
//! API driven by a per-user key.

use std::time::Duration;

use crate::services::ProviderError;

const FREE_TIMEOUT: Duration = Duration::from_secs(10);
const OFFICIAL_TIMEOUT: Duration = Duration::from_secs(15);
const DETECT_TIMEOUT: Duration = Duration::from_secs(5);

// Detection only needs a prefix of the text.
const DETECT_SAMPLE_CHARS: usize = 100;

/// Free endpoint. The response is a nested JSON array; translated segments
/// sit at `[0][i][0]` and are concatenated in order.
pub async fn translate_free(
    client: &reqwest::Client,
    base_url: &str,
    text: &str,
    target_language: &str,
    source_language: &str,
) -> Result<String, ProviderError> {
    let body = fetch_free(
        client,
        base_url,
        text,
        target_language,
        source_language,
        FREE_TIMEOUT,
    )
    .await?;

    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or(ProviderError::Malformed)?;

    let mut translation = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
            translation.push_str(part);
        }
    }

    let translation = translation.trim().to_string();
    if translation.is_empty() {
        return Err(ProviderError::Malformed);
    }
    Ok(translation)
}

/// Detects the language of `text` by asking the free endpoint to translate a
/// short sample to English; the detected source code comes back at `[2]`.
pub async fn detect_language(
    client: &reqwest::Client,
    base_url: &str,
    text: &str,
) -> Result<String, ProviderError> {
    let sample: String = text.chars().take(DETECT_SAMPLE_CHARS).collect();
    let body = fetch_free(client, base_url, &sample, "en", "auto", DETECT_TIMEOUT).await?;

    body.get(2)
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or(ProviderError::Malformed)
}

async fn fetch_free(
    client: &reqwest::Client,
    base_url: &str,
    text: &str,
    target_language: &str,
    source_language: &str,
    timeout: Duration,
) -> Result<serde_json::Value, ProviderError> {
    let url = format!("{base_url}/translate_a/single");
    let response = client
        .get(&url)
        .query(&[
            ("client", "gtx"),
            ("sl", source_language),
            ("tl", target_language),
            ("dt", "t"),
            ("q", text),
        ])
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus { status, body });
    }

    Ok(response.json().await?)
}

/// Official Translate v2 with the user's own key. `source` is omitted when
/// the request asks for auto-detection.
pub async fn translate_official(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    text: &str,
    target_language: &str,
    source_language: &str,
) -> Result<String, ProviderError> {
    let url = format!("{base_url}/language/translate/v2");

    let mut params: Vec<(&str, &str)> = vec![
        ("key", api_key),
        ("q", text),
        ("target", target_language),
    ];
    if source_language != "auto" {
        params.push(("source", source_language));
    }

    let response = client
        .get(&url)
        .query(&params)
        .timeout(OFFICIAL_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::HttpStatus { status, body });
    }

    let body: serde_json::Value = response.json().await?;
    body.pointer("/data/translations/0/translatedText")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or(ProviderError::Malformed)
}
