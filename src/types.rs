use serde::{Deserialize, Serialize};

/// Playback speed for synthesized audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceSpeed {
    Fast,
    Normal,
    Slow,
}

impl VoiceSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceSpeed::Fast => "fast",
            VoiceSpeed::Normal => "normal",
            VoiceSpeed::Slow => "slow",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fast" => Some(VoiceSpeed::Fast),
            "normal" => Some(VoiceSpeed::Normal),
            "slow" => Some(VoiceSpeed::Slow),
            _ => None,
        }
    }
}

impl Default for VoiceSpeed {
    fn default() -> Self {
        VoiceSpeed::Normal
    }
}

/// TTS service selector. Requests may carry any variant; stored profile
/// preferences are restricted to the four concrete playback choices
/// (see [`TtsService::is_profile_choice`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsService {
    Auto,
    Browser,
    Google,
    GoogleCloud,
    Elevenlabs,
    Groq,
}

impl TtsService {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsService::Auto => "auto",
            TtsService::Browser => "browser",
            TtsService::Google => "google",
            TtsService::GoogleCloud => "google_cloud",
            TtsService::Elevenlabs => "elevenlabs",
            TtsService::Groq => "groq",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(TtsService::Auto),
            "browser" => Some(TtsService::Browser),
            "google" => Some(TtsService::Google),
            "google_cloud" => Some(TtsService::GoogleCloud),
            "elevenlabs" => Some(TtsService::Elevenlabs),
            "groq" => Some(TtsService::Groq),
            _ => None,
        }
    }

    /// Variants a profile may store as its preferred TTS service.
    pub fn is_profile_choice(&self) -> bool {
        matches!(
            self,
            TtsService::Browser
                | TtsService::Google
                | TtsService::GoogleCloud
                | TtsService::Elevenlabs
        )
    }
}

/// Translation service selector, shared between request hints and the stored
/// profile preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationService {
    Auto,
    Groq,
    Google,
    Basic,
}

impl TranslationService {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationService::Auto => "auto",
            TranslationService::Groq => "groq",
            TranslationService::Google => "google",
            TranslationService::Basic => "basic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(TranslationService::Auto),
            "groq" => Some(TranslationService::Groq),
            "google" => Some(TranslationService::Google),
            "basic" => Some(TranslationService::Basic),
            _ => None,
        }
    }
}

impl Default for TranslationService {
    fn default() -> Self {
        TranslationService::Auto
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tts_service_roundtrip() {
        for value in ["auto", "browser", "google", "google_cloud", "elevenlabs", "groq"] {
            let parsed = TtsService::parse(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        assert!(TtsService::parse("siri").is_none());
    }

    #[test]
    fn profile_choice_excludes_auto_and_groq() {
        assert!(!TtsService::Auto.is_profile_choice());
        assert!(!TtsService::Groq.is_profile_choice());
        assert!(TtsService::GoogleCloud.is_profile_choice());
        assert!(TtsService::Browser.is_profile_choice());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TtsService::GoogleCloud).unwrap();
        assert_eq!(json, "\"google_cloud\"");
        let parsed: VoiceSpeed = serde_json::from_str("\"slow\"").unwrap();
        assert_eq!(parsed, VoiceSpeed::Slow);
    }
}
