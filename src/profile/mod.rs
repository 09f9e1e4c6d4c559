//! The persisted user profile and its storage.
//!
//! * [`Profile`]: name, native language, provider and API key.
//! * [`Provider`]: the closed set of LLM providers.
//! * [`ProfileStore`]: JSON key-value file holding the profile.
//! * [`AppContext`]: the in-memory current profile plus change observers,
//!   handed to every screen instead of a global.

pub mod context;
pub mod store;

pub use context::AppContext;
pub use store::{ProfileStore, HISTORY_KEY, PROFILE_KEY};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ProfileError
// ---------------------------------------------------------------------------

/// Errors raised when validating or persisting a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A required field is empty; partially filled profiles are never stored.
    #[error("profile field `{0}` must not be empty")]
    Incomplete(&'static str),

    /// The provider is not one of the supported variants.
    #[error("Invalid AI provider")]
    InvalidProvider,

    /// Reading or writing the store file failed.
    #[error("profile store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store contents could not be (de)serialised.
    #[error("profile store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// LLM provider named by the profile.
///
/// Unrecognised values read from disk deserialise to [`Provider::Unknown`]
/// so the relay can reject them with a configuration error instead of the
/// whole profile failing to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Groq,
    #[serde(other)]
    Unknown,
}

impl Provider {
    /// Selectable providers, in the order the forms list them.
    pub const ALL: [Provider; 2] = [Provider::Gemini, Provider::Groq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Groq => "groq",
            Provider::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::Groq => "Groq",
            Provider::Unknown => "Unknown provider",
        }
    }

    /// Where the user can create an API key for this provider.
    pub fn key_help_url(&self) -> Option<&'static str> {
        match self {
            Provider::Gemini => Some("https://aistudio.google.com/app/apikey"),
            Provider::Groq => Some("https://console.groq.com/keys"),
            Provider::Unknown => None,
        }
    }

    /// Label for the API-key input field.
    pub fn key_label(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini API Key",
            Provider::Groq => "Groq API Key",
            Provider::Unknown => "API Key",
        }
    }
}

// ---------------------------------------------------------------------------
// Native languages
// ---------------------------------------------------------------------------

/// Native languages offered by the onboarding and settings forms as
/// `(stored value, label)`.  The profile field itself is free text.
pub const NATIVE_LANGUAGES: &[(&str, &str)] = &[
    ("Tamil", "Tamil (தமிழ்)"),
    ("Hindi", "Hindi (हिंदी)"),
    ("Telugu", "Telugu (తెలుగు)"),
    ("Other", "Other"),
];

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The single persisted user record.
///
/// Serialised with the keys `name`, `nativeLanguage`, `aiProvider`,
/// `apiKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub native_language: String,
    pub ai_provider: Provider,
    pub api_key: String,
}

impl Profile {
    /// Checks that every field is populated and the provider is supported.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::Incomplete("name"));
        }
        if self.native_language.trim().is_empty() {
            return Err(ProfileError::Incomplete("nativeLanguage"));
        }
        if self.ai_provider == Provider::Unknown {
            return Err(ProfileError::InvalidProvider);
        }
        if self.api_key.trim().is_empty() {
            return Err(ProfileError::Incomplete("apiKey"));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Profile {
        Profile {
            name: "Priya".into(),
            native_language: "Tamil".into(),
            ai_provider: Provider::Groq,
            api_key: "gsk_test".into(),
        }
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["name"], "Priya");
        assert_eq!(json["nativeLanguage"], "Tamil");
        assert_eq!(json["aiProvider"], "groq");
        assert_eq!(json["apiKey"], "gsk_test");
    }

    #[test]
    fn unknown_provider_deserialises_to_unknown() {
        let json = r#"{"name":"A","nativeLanguage":"Hindi","aiProvider":"openai","apiKey":"k"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.ai_provider, Provider::Unknown);
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidProvider)
        ));
    }

    #[test]
    fn complete_profile_validates() {
        assert!(sample().is_complete());
    }

    #[test]
    fn each_empty_field_is_rejected() {
        let mut p = sample();
        p.name = "  ".into();
        assert!(matches!(p.validate(), Err(ProfileError::Incomplete("name"))));

        let mut p = sample();
        p.native_language.clear();
        assert!(matches!(
            p.validate(),
            Err(ProfileError::Incomplete("nativeLanguage"))
        ));

        let mut p = sample();
        p.api_key.clear();
        assert!(matches!(
            p.validate(),
            Err(ProfileError::Incomplete("apiKey"))
        ));
    }

    #[test]
    fn selectable_providers_have_key_links() {
        for provider in Provider::ALL {
            let json = serde_json::to_value(provider).unwrap();
            assert_eq!(json, provider.as_str());
            assert!(provider.key_help_url().is_some());
        }
        assert!(Provider::Unknown.key_help_url().is_none());
    }
}
