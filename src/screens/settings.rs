//! Profile editing and account deletion.

use super::ProfileForm;
use crate::profile::AppContext;

#[derive(Debug, Default)]
pub struct Settings {
    pub form: ProfileForm,
    editing: bool,
    confirm_delete: bool,
    error: Option<String>,
}

impl Settings {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            form: ProfileForm::from_profile(ctx.profile()),
            ..Default::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirm_delete
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn edit(&mut self) {
        self.editing = true;
    }

    /// Discard edits and show the saved profile again.
    pub fn cancel(&mut self, ctx: &AppContext) {
        self.form = ProfileForm::from_profile(ctx.profile());
        self.editing = false;
        self.error = None;
    }

    /// Replace the whole profile with the form contents.
    pub fn save(&mut self, ctx: &mut AppContext) -> bool {
        let Some(profile) = self.form.to_profile() else {
            self.error = Some("Please fill in every field before saving".into());
            return false;
        };
        match ctx.save_profile(profile) {
            Ok(()) => {
                self.editing = false;
                self.error = None;
                true
            }
            Err(e) => {
                log::error!("Failed to save profile: {e}");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn request_delete(&mut self) {
        self.confirm_delete = true;
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    /// Remove all stored data.  Returns `true` when the caller should go
    /// back to onboarding.
    pub fn confirm_delete(&mut self, ctx: &mut AppContext) -> bool {
        self.confirm_delete = false;
        match ctx.delete_all_data() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to delete user data: {e}");
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Profile, ProfileStore, Provider, HISTORY_KEY};
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::{tempdir, TempDir};

    fn context() -> (TempDir, AppContext) {
        let dir = tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("store.json"));
        store
            .save_profile(&Profile {
                name: "Lakshmi".into(),
                native_language: "Tamil".into(),
                ai_provider: Provider::Gemini,
                api_key: "old-key".into(),
            })
            .unwrap();
        store
            .put(HISTORY_KEY, serde_json::json!([{"role": "user"}]))
            .unwrap();
        let ctx = AppContext::load(store);
        (dir, ctx)
    }

    #[test]
    fn save_replaces_profile_and_notifies() {
        let (_dir, mut ctx) = context();
        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        ctx.subscribe(move |_| counter.set(counter.get() + 1));

        let mut screen = Settings::new(&ctx);
        screen.edit();
        screen.form.provider = Some(Provider::Groq);
        screen.form.api_key = "gsk-new".into();
        assert!(screen.save(&mut ctx));

        let profile = ctx.profile().unwrap();
        assert_eq!(profile.ai_provider, Provider::Groq);
        assert_eq!(profile.api_key, "gsk-new");
        assert_eq!(profile.name, "Lakshmi");
        assert!(!screen.is_editing());
        assert_eq!(notified.get(), 1);
    }

    #[test]
    fn cancel_restores_saved_values() {
        let (_dir, ctx) = context();
        let mut screen = Settings::new(&ctx);
        screen.edit();
        screen.form.name = "Someone else".into();
        screen.cancel(&ctx);
        assert_eq!(screen.form.name, "Lakshmi");
        assert!(!screen.is_editing());
    }

    #[test]
    fn incomplete_form_is_not_saved() {
        let (_dir, mut ctx) = context();
        let mut screen = Settings::new(&ctx);
        screen.edit();
        screen.form.api_key.clear();
        assert!(!screen.save(&mut ctx));
        assert!(screen.error().is_some());
        assert_eq!(ctx.profile().unwrap().api_key, "old-key");
    }

    #[test]
    fn delete_requires_confirmation_and_clears_history() {
        let (dir, mut ctx) = context();
        let mut screen = Settings::new(&ctx);
        screen.request_delete();
        assert!(screen.is_confirming_delete());
        screen.cancel_delete();
        assert!(ctx.has_profile());

        screen.request_delete();
        assert!(screen.confirm_delete(&mut ctx));
        assert!(!ctx.has_profile());

        let store = ProfileStore::open(dir.path().join("store.json"));
        assert!(store.load_profile().is_none());
        assert!(store.get(HISTORY_KEY).is_none());
    }
}
