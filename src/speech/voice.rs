//! Voice metadata and selection.

/// A synthesis voice as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Value passed back to the engine to select this voice.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// BCP-47-ish language tag (`en_US`, `en-gb`, …).
    pub lang: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lang: lang.into(),
        }
    }

    pub fn is_english(&self) -> bool {
        self.lang.starts_with("en")
    }
}

/// Name fragments (lowercase) of preferred English voices.
pub const PREFERRED_VOICE_NAMES: [&str; 4] = ["female", "samantha", "karen", "victoria"];

/// Voice for tutor replies: the first English voice whose name contains a
/// preferred fragment, else the first English voice, else `None` (engine
/// default).
pub fn pick_voice(voices: &[Voice]) -> Option<&Voice> {
    voices
        .iter()
        .find(|v| {
            let name = v.name.to_lowercase();
            v.is_english() && PREFERRED_VOICE_NAMES.iter().any(|p| name.contains(p))
        })
        .or_else(|| voices.iter().find(|v| v.is_english()))
}

/// Prosody for one utterance, in Web-Speech-style units: rate and pitch
/// are multipliers around 1.0, volume is `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtteranceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for UtteranceSettings {
    /// Slightly slow and slightly high, which learners find easier to follow.
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.1,
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str, lang: &str) -> Voice {
        Voice::new(name, name, lang)
    }

    #[test]
    fn prefers_allow_listed_english_voice() {
        let voices = vec![v("Alex", "en_US"), v("Amélie", "fr_CA"), v("Samantha", "en_US")];
        assert_eq!(pick_voice(&voices).map(|v| v.name.as_str()), Some("Samantha"));
    }

    #[test]
    fn allow_list_ignores_non_english() {
        let voices = vec![v("Victoria Français", "fr_FR"), v("Daniel", "en_GB")];
        assert_eq!(pick_voice(&voices).map(|v| v.name.as_str()), Some("Daniel"));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let voices = vec![v("Daniel", "en_GB"), v("English (America) FEMALE", "en-us")];
        assert_eq!(
            pick_voice(&voices).map(|v| v.name.as_str()),
            Some("English (America) FEMALE")
        );
    }

    #[test]
    fn no_english_voice_means_engine_default() {
        let voices = vec![v("Thomas", "fr_FR"), v("Anna", "de_DE")];
        assert!(pick_voice(&voices).is_none());
        assert!(pick_voice(&[]).is_none());
    }

    #[test]
    fn default_settings() {
        let s = UtteranceSettings::default();
        assert_eq!((s.rate, s.pitch, s.volume), (0.9, 1.1, 1.0));
    }
}
