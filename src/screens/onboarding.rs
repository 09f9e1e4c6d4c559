//! First-run setup: personal info, then AI provider and key.

use super::ProfileForm;
use crate::profile::{AppContext, Provider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    PersonalInfo,
    AiSetup,
}

#[derive(Debug)]
pub struct Onboarding {
    pub step: OnboardingStep,
    pub form: ProfileForm,
    error: Option<String>,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new()
    }
}

impl Onboarding {
    pub fn new() -> Self {
        Self {
            step: OnboardingStep::PersonalInfo,
            form: ProfileForm::default(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_provider(&mut self, provider: Provider) {
        self.form.provider = Some(provider);
    }

    pub fn can_continue(&self) -> bool {
        match self.step {
            OnboardingStep::PersonalInfo => self.form.personal_info_complete(),
            OnboardingStep::AiSetup => self.form.to_profile().is_some(),
        }
    }

    /// "Continue" on step one, "Get Started" on step two.
    ///
    /// Returns `true` once the profile has been saved; nothing is written
    /// before that.
    pub fn submit(&mut self, ctx: &mut AppContext) -> bool {
        match self.step {
            OnboardingStep::PersonalInfo => {
                if self.form.personal_info_complete() {
                    self.step = OnboardingStep::AiSetup;
                }
                false
            }
            OnboardingStep::AiSetup => {
                let Some(profile) = self.form.to_profile() else {
                    return false;
                };
                match ctx.save_profile(profile) {
                    Ok(()) => true,
                    Err(e) => {
                        log::error!("Failed to save profile: {e}");
                        self.error = Some(e.to_string());
                        false
                    }
                }
            }
        }
    }

    pub fn back(&mut self) {
        self.step = OnboardingStep::PersonalInfo;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileStore;
    use tempfile::tempdir;

    #[test]
    fn step_two_requires_step_one() {
        let dir = tempdir().unwrap();
        let mut ctx = AppContext::load(ProfileStore::open(dir.path().join("store.json")));
        let mut screen = Onboarding::new();

        screen.form.name = "Kavya".into();
        assert!(!screen.can_continue());
        assert!(!screen.submit(&mut ctx));
        assert_eq!(screen.step, OnboardingStep::PersonalInfo);

        screen.form.native_language = "Telugu".into();
        assert!(!screen.submit(&mut ctx));
        assert_eq!(screen.step, OnboardingStep::AiSetup);
        assert!(!ctx.has_profile());
    }

    #[test]
    fn completes_only_with_provider_and_key() {
        let dir = tempdir().unwrap();
        let mut ctx = AppContext::load(ProfileStore::open(dir.path().join("store.json")));
        let mut screen = Onboarding::new();
        screen.form.name = "Kavya".into();
        screen.form.native_language = "Telugu".into();
        screen.submit(&mut ctx);

        screen.form.api_key = "AIza-test".into();
        assert!(!screen.submit(&mut ctx));
        assert!(!ctx.has_profile());

        screen.select_provider(Provider::Gemini);
        assert!(screen.submit(&mut ctx));
        let saved = ctx.profile().unwrap();
        assert_eq!(saved.name, "Kavya");
        assert_eq!(saved.ai_provider, Provider::Gemini);

        let reloaded = ProfileStore::open(dir.path().join("store.json")).load_profile();
        assert_eq!(reloaded.as_ref(), Some(saved));
    }

    #[test]
    fn back_returns_to_first_step_keeping_fields() {
        let mut screen = Onboarding::new();
        screen.form.name = "Kavya".into();
        screen.step = OnboardingStep::AiSetup;
        screen.back();
        assert_eq!(screen.step, OnboardingStep::PersonalInfo);
        assert_eq!(screen.form.name, "Kavya");
    }
}
