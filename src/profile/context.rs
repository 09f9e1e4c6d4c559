//! Application context: the current profile plus change observers.
//!
//! One [`AppContext`] is built at startup from the [`ProfileStore`] and
//! passed by reference to every screen.  Writes go through the context so
//! the store and the in-memory copy never disagree, and every observer is
//! told about the new value after the write commits.

use super::{Profile, ProfileError, ProfileStore};

/// Callback invoked with the new profile (or `None` after deletion).
pub type ProfileObserver = Box<dyn FnMut(Option<&Profile>)>;

pub struct AppContext {
    store: ProfileStore,
    profile: Option<Profile>,
    observers: Vec<ProfileObserver>,
}

impl AppContext {
    /// Build the context, reading the saved profile (if any) from `store`.
    pub fn load(store: ProfileStore) -> Self {
        let profile = store.load_profile();
        match &profile {
            Some(p) => log::info!("Loaded profile for {}", p.name),
            None => log::info!("No saved profile; onboarding required"),
        }
        Self {
            store,
            profile,
            observers: Vec::new(),
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }

    /// Register `observer` to be called after every profile change.
    pub fn subscribe(&mut self, observer: impl FnMut(Option<&Profile>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Persist `profile` and make it current, replacing every field of the
    /// previous one.
    ///
    /// Nothing changes (in memory or on disk) when validation or the write
    /// fails.
    pub fn save_profile(&mut self, profile: Profile) -> Result<(), ProfileError> {
        self.store.save_profile(&profile)?;
        log::info!(
            "Profile saved (provider: {})",
            profile.ai_provider.as_str()
        );
        self.profile = Some(profile);
        self.notify();
        Ok(())
    }

    /// Remove the profile and stored conversation history.
    pub fn delete_all_data(&mut self) -> Result<(), ProfileError> {
        self.store.delete_all()?;
        log::info!("All user data deleted");
        self.profile = None;
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        let current = self.profile.as_ref();
        for observer in self.observers.iter_mut() {
            observer(current);
        }
    }
}
