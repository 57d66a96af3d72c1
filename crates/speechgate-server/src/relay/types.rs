//! Request and payload types for the synthesis relay.

use serde::{Deserialize, Serialize};

use crate::config::VoiceDefaults;

/// Body accepted on `POST /api/generate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SynthesisRequest {
    #[serde(rename = "voiceId")]
    pub voice_id: Option<String>,
    pub text: Option<String>,
    pub stability: Option<f64>,
    pub similarity_boost: Option<f64>,
    pub style: Option<f64>,
    pub use_speaker_boost: Option<bool>,
}

impl SynthesisRequest {
    /// Returns the voice id and text if both are present and non-empty.
    pub fn required_fields(&self) -> Option<(&str, &str)> {
        let voice_id = self.voice_id.as_deref().filter(|v| !v.is_empty())?;
        let text = self.text.as_deref().filter(|t| !t.is_empty())?;
        Some((voice_id, text))
    }

    /// Fills unset settings from the configured defaults.
    pub fn voice_settings(&self, defaults: &VoiceDefaults) -> VoiceSettings {
        VoiceSettings {
            stability: self.stability.unwrap_or(defaults.stability),
            similarity_boost: self.similarity_boost.unwrap_or(defaults.similarity_boost),
            style: self.style.unwrap_or(defaults.style),
            use_speaker_boost: self.use_speaker_boost.unwrap_or(defaults.use_speaker_boost),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,
}

/// Body sent to the provider.
#[derive(Debug, Serialize)]
pub struct UpstreamPayload<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
}
