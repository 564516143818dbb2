//! Provider selection for TTS and translation: each cascade is an ordered
//! list of capability-tagged tiers with an availability predicate and an
//! invocation, tried in fixed priority order with first-success-wins
//! semantics. Provider failures are logged and advance to the next tier;
//! both cascades always produce a usable (possibly degraded) result.

use crate::db::operations::user::UserProfile;
use crate::services::{dictionary, elevenlabs, google_speech, google_translate, groq};
use crate::services::{ProviderError, Providers};
use crate::types::{TranslationService, TtsService, VoiceSpeed};

/// Non-empty API keys pulled out of a profile.
#[derive(Debug, Default, Clone)]
pub struct ProviderKeys {
    pub elevenlabs: Option<String>,
    pub groq: Option<String>,
    pub google_translate: Option<String>,
    pub google_tts: Option<String>,
}

impl ProviderKeys {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            elevenlabs: profile.elevenlabs_key().map(str::to_string),
            groq: profile.groq_key().map(str::to_string),
            google_translate: profile.google_translate_key().map(str::to_string),
            google_tts: profile.google_tts_key().map(str::to_string),
        }
    }
}

/// Substitutes the stored preference when the caller asked for `auto` and a
/// profile is present.
pub fn resolve_tts_service(requested: TtsService, profile: Option<&UserProfile>) -> TtsService {
    match (requested, profile) {
        (TtsService::Auto, Some(profile)) => profile.preferred_tts_service,
        _ => requested,
    }
}

pub fn resolve_translation_service(
    requested: TranslationService,
    profile: Option<&UserProfile>,
) -> TranslationService {
    match (requested, profile) {
        (TranslationService::Auto, Some(profile)) => profile.preferred_translation_service,
        _ => requested,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsTier {
    ElevenLabs,
    GoogleCloud,
    Groq,
    GoogleProxy,
}

pub const TTS_TIERS: [TtsTier; 4] = [
    TtsTier::ElevenLabs,
    TtsTier::GoogleCloud,
    TtsTier::Groq,
    TtsTier::GoogleProxy,
];

impl TtsTier {
    pub fn service(self) -> TtsService {
        match self {
            TtsTier::ElevenLabs => TtsService::Elevenlabs,
            TtsTier::GoogleCloud => TtsService::GoogleCloud,
            TtsTier::Groq => TtsService::Groq,
            TtsTier::GoogleProxy => TtsService::Google,
        }
    }

    fn eligible(self, keys: &ProviderKeys, actual: TtsService) -> bool {
        match self {
            TtsTier::ElevenLabs => {
                keys.elevenlabs.is_some()
                    && matches!(actual, TtsService::Elevenlabs | TtsService::Auto)
            }
            TtsTier::GoogleCloud => {
                keys.google_tts.is_some()
                    && (actual == TtsService::GoogleCloud
                        || (actual == TtsService::Auto && keys.elevenlabs.is_none()))
            }
            // Groq is only consulted on an explicit hint; the tier itself is
            // a permanent no-op until Groq ships a TTS API.
            TtsTier::Groq => keys.groq.is_some() && actual == TtsService::Groq,
            // Universal fallback, no key required.
            TtsTier::GoogleProxy => true,
        }
    }
}

/// The ordered tiers a request will attempt. Guests only get the free proxy.
pub fn tts_plan(keys: Option<&ProviderKeys>, actual: TtsService) -> Vec<TtsTier> {
    match keys {
        Some(keys) => TTS_TIERS
            .iter()
            .copied()
            .filter(|tier| tier.eligible(keys, actual))
            .collect(),
        None => vec![TtsTier::GoogleProxy],
    }
}

#[derive(Debug, Clone)]
pub struct TtsRequest {
    pub text: String,
    pub speed: VoiceSpeed,
    pub language: String,
}

#[derive(Debug, Clone)]
pub enum TtsOutcome {
    Audio {
        service: TtsService,
        audio_base64: String,
    },
    /// Every tier failed; the caller should synthesize client-side.
    Browser,
}

pub async fn run_tts_cascade(
    providers: &Providers,
    keys: Option<&ProviderKeys>,
    actual: TtsService,
    request: &TtsRequest,
) -> TtsOutcome {
    for tier in tts_plan(keys, actual) {
        match invoke_tts_tier(providers, keys, tier, request).await {
            Ok(audio) if !audio.is_empty() => {
                return TtsOutcome::Audio {
                    service: tier.service(),
                    audio_base64: audio,
                };
            }
            Ok(_) => {
                tracing::warn!(tier = ?tier, "TTS provider returned empty payload");
            }
            Err(err) => {
                tracing::warn!(tier = ?tier, error = %err, "TTS provider failed, trying next");
            }
        }
    }
    TtsOutcome::Browser
}

async fn invoke_tts_tier(
    providers: &Providers,
    keys: Option<&ProviderKeys>,
    tier: TtsTier,
    request: &TtsRequest,
) -> Result<String, ProviderError> {
    let client = providers.client();
    let endpoints = providers.endpoints();

    match tier {
        TtsTier::ElevenLabs => {
            let key = keys
                .and_then(|k| k.elevenlabs.as_deref())
                .ok_or(ProviderError::MissingKey)?;
            elevenlabs::synthesize(client, &endpoints.elevenlabs, key, &request.text, request.speed)
                .await
        }
        TtsTier::GoogleCloud => {
            let key = keys
                .and_then(|k| k.google_tts.as_deref())
                .ok_or(ProviderError::MissingKey)?;
            google_speech::synthesize_cloud(
                client,
                &endpoints.google_cloud_tts,
                key,
                &request.text,
                request.speed,
                &request.language,
            )
            .await
        }
        TtsTier::Groq => {
            let key = keys
                .and_then(|k| k.groq.as_deref())
                .ok_or(ProviderError::MissingKey)?;
            groq::synthesize(client, &endpoints.groq, key, &request.text, request.speed).await
        }
        TtsTier::GoogleProxy => {
            google_speech::synthesize_proxy(
                client,
                &endpoints.google_tts_proxy,
                &request.text,
                request.speed,
                &request.language,
            )
            .await
        }
    }
}

/// Resolves `auto` to a detected language, defaulting to English when
/// detection fails or comes back empty.
pub async fn resolve_source_language(
    providers: &Providers,
    text: &str,
    source_language: &str,
) -> String {
    if source_language != "auto" {
        return source_language.to_string();
    }

    match google_translate::detect_language(
        providers.client(),
        &providers.endpoints().google_translate_free,
        text,
    )
    .await
    {
        Ok(lang) => lang,
        Err(err) => {
            tracing::warn!(error = %err, "language detection failed, defaulting to en");
            "en".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationTier {
    Groq,
    GoogleOfficial,
    GoogleFree,
    Basic,
}

pub const TRANSLATION_TIERS: [TranslationTier; 4] = [
    TranslationTier::Groq,
    TranslationTier::GoogleOfficial,
    TranslationTier::GoogleFree,
    TranslationTier::Basic,
];

impl TranslationTier {
    /// Service name reported to the client on success.
    pub fn service_name(self) -> &'static str {
        match self {
            TranslationTier::Groq => "groq",
            TranslationTier::GoogleOfficial => "google_official",
            TranslationTier::GoogleFree => "google",
            TranslationTier::Basic => "basic",
        }
    }

    fn eligible(self, keys: Option<&ProviderKeys>, actual: TranslationService) -> bool {
        match self {
            TranslationTier::Groq => {
                keys.is_some_and(|k| k.groq.is_some())
                    && matches!(actual, TranslationService::Groq | TranslationService::Auto)
            }
            TranslationTier::GoogleOfficial => {
                keys.is_some_and(|k| k.google_translate.is_some())
                    && matches!(actual, TranslationService::Google | TranslationService::Auto)
            }
            // The free endpoint is attempted for everyone, regardless of the
            // stored preference; the dictionary closes the cascade.
            TranslationTier::GoogleFree | TranslationTier::Basic => true,
        }
    }
}

pub fn translation_plan(
    keys: Option<&ProviderKeys>,
    actual: TranslationService,
) -> Vec<TranslationTier> {
    TRANSLATION_TIERS
        .iter()
        .copied()
        .filter(|tier| tier.eligible(keys, actual))
        .collect()
}

#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
    pub source_language: String,
}

/// Runs the translation cascade. Total: the basic dictionary tier cannot
/// fail, so every request yields a translation and the service that made it.
pub async fn run_translation_cascade(
    providers: &Providers,
    keys: Option<&ProviderKeys>,
    actual: TranslationService,
    request: &TranslationRequest,
) -> (&'static str, String) {
    for tier in translation_plan(keys, actual) {
        match invoke_translation_tier(providers, keys, tier, request).await {
            Ok(translation) if !translation.is_empty() => {
                return (tier.service_name(), translation);
            }
            Ok(_) => {
                tracing::warn!(tier = ?tier, "translation provider returned empty result");
            }
            Err(err) => {
                tracing::warn!(tier = ?tier, error = %err, "translation provider failed, trying next");
            }
        }
    }

    // Unreachable in practice; the dictionary tier never errors.
    (
        TranslationTier::Basic.service_name(),
        dictionary::get_basic_translation(&request.text),
    )
}

async fn invoke_translation_tier(
    providers: &Providers,
    keys: Option<&ProviderKeys>,
    tier: TranslationTier,
    request: &TranslationRequest,
) -> Result<String, ProviderError> {
    let client = providers.client();
    let endpoints = providers.endpoints();

    match tier {
        TranslationTier::Groq => {
            let key = keys
                .and_then(|k| k.groq.as_deref())
                .ok_or(ProviderError::MissingKey)?;
            groq::translate(
                client,
                &endpoints.groq,
                key,
                &request.text,
                &request.target_language,
                &request.source_language,
            )
            .await
        }
        TranslationTier::GoogleOfficial => {
            let key = keys
                .and_then(|k| k.google_translate.as_deref())
                .ok_or(ProviderError::MissingKey)?;
            google_translate::translate_official(
                client,
                &endpoints.google_translate_official,
                key,
                &request.text,
                &request.target_language,
                &request.source_language,
            )
            .await
        }
        TranslationTier::GoogleFree => {
            google_translate::translate_free(
                client,
                &endpoints.google_translate_free,
                &request.text,
                &request.target_language,
                &request.source_language,
            )
            .await
        }
        TranslationTier::Basic => Ok(dictionary::get_basic_translation(&request.text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(
        elevenlabs: bool,
        groq: bool,
        google_translate: bool,
        google_tts: bool,
    ) -> ProviderKeys {
        let key = |on: bool| on.then(|| "k".to_string());
        ProviderKeys {
            elevenlabs: key(elevenlabs),
            groq: key(groq),
            google_translate: key(google_translate),
            google_tts: key(google_tts),
        }
    }

    #[test]
    fn guest_tts_plan_is_proxy_only() {
        assert_eq!(tts_plan(None, TtsService::Auto), vec![TtsTier::GoogleProxy]);
    }

    #[test]
    fn google_cloud_key_with_auto_selects_cloud_then_proxy() {
        let keys = keys(false, false, false, true);
        assert_eq!(
            tts_plan(Some(&keys), TtsService::Auto),
            vec![TtsTier::GoogleCloud, TtsTier::GoogleProxy]
        );
    }

    #[test]
    fn elevenlabs_key_shadows_google_cloud_on_auto() {
        let keys = keys(true, false, false, true);
        assert_eq!(
            tts_plan(Some(&keys), TtsService::Auto),
            vec![TtsTier::ElevenLabs, TtsTier::GoogleProxy]
        );
    }

    #[test]
    fn explicit_google_cloud_hint_ignores_elevenlabs() {
        let keys = keys(true, false, false, true);
        assert_eq!(
            tts_plan(Some(&keys), TtsService::GoogleCloud),
            vec![TtsTier::GoogleCloud, TtsTier::GoogleProxy]
        );
    }

    #[test]
    fn groq_tier_requires_exact_hint() {
        let keys = keys(false, true, false, false);
        assert_eq!(
            tts_plan(Some(&keys), TtsService::Auto),
            vec![TtsTier::GoogleProxy]
        );
        assert_eq!(
            tts_plan(Some(&keys), TtsService::Groq),
            vec![TtsTier::Groq, TtsTier::GoogleProxy]
        );
    }

    #[test]
    fn browser_preference_still_reaches_proxy() {
        let keys = keys(true, true, true, true);
        assert_eq!(
            tts_plan(Some(&keys), TtsService::Browser),
            vec![TtsTier::GoogleProxy]
        );
    }

    #[test]
    fn guest_translation_plan_is_free_then_basic() {
        assert_eq!(
            translation_plan(None, TranslationService::Auto),
            vec![TranslationTier::GoogleFree, TranslationTier::Basic]
        );
    }

    #[test]
    fn groq_key_with_auto_leads_the_translation_plan() {
        let keys = keys(false, true, true, false);
        assert_eq!(
            translation_plan(Some(&keys), TranslationService::Auto),
            vec![
                TranslationTier::Groq,
                TranslationTier::GoogleOfficial,
                TranslationTier::GoogleFree,
                TranslationTier::Basic
            ]
        );
    }

    #[test]
    fn basic_preference_still_attempts_free_google_first() {
        let keys = keys(false, true, true, false);
        assert_eq!(
            translation_plan(Some(&keys), TranslationService::Basic),
            vec![TranslationTier::GoogleFree, TranslationTier::Basic]
        );
    }
}
