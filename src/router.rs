//! Routes and the profile guard.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Onboarding,
    Dashboard,
    Settings,
    VoiceChat,
    TextChat,
    Conversations,
    GrammarCheck,
    ReplyGenerator,
}

impl Route {
    /// Entries of the navigation bar, in display order.
    pub const NAV: [Route; 6] = [
        Route::Dashboard,
        Route::VoiceChat,
        Route::TextChat,
        Route::Conversations,
        Route::GrammarCheck,
        Route::ReplyGenerator,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Onboarding => "/setup",
            Route::Dashboard => "/",
            Route::Settings => "/settings",
            Route::VoiceChat => "/voice-chat",
            Route::TextChat => "/text-chat",
            Route::Conversations => "/conversations",
            Route::GrammarCheck => "/grammar-check",
            Route::ReplyGenerator => "/reply-generator",
        }
    }

    /// Short label for the navigation bar.
    pub fn nav_label(&self) -> &'static str {
        match self {
            Route::Onboarding => "Setup",
            Route::Dashboard => "Dashboard",
            Route::Settings => "Settings",
            Route::VoiceChat => "Voice Chat",
            Route::TextChat => "Text Chat",
            Route::Conversations => "Conversations",
            Route::GrammarCheck => "Grammar",
            Route::ReplyGenerator => "Reply Gen",
        }
    }

    /// Heading shown above the screen.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Onboarding => "Welcome to English AI Practice",
            Route::Dashboard => "Dashboard",
            Route::Settings => "Settings",
            Route::VoiceChat => "Voice Chat",
            Route::TextChat => "Text Chat",
            Route::Conversations => "Conversations",
            Route::GrammarCheck => "Grammar Check",
            Route::ReplyGenerator => "Reply Generator",
        }
    }

    /// Apply the profile guard: without a profile everything leads to
    /// onboarding; with one, onboarding leads to the dashboard.
    pub fn resolve(requested: Route, has_profile: bool) -> Route {
        match (requested, has_profile) {
            (_, false) => Route::Onboarding,
            (Route::Onboarding, true) => Route::Dashboard,
            (route, true) => route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Route; 8] = [
        Route::Onboarding,
        Route::Dashboard,
        Route::Settings,
        Route::VoiceChat,
        Route::TextChat,
        Route::Conversations,
        Route::GrammarCheck,
        Route::ReplyGenerator,
    ];

    #[test]
    fn without_profile_everything_is_onboarding() {
        for route in ALL {
            assert_eq!(Route::resolve(route, false), Route::Onboarding, "{route:?}");
        }
    }

    #[test]
    fn with_profile_only_onboarding_redirects() {
        for route in ALL {
            let expected = if route == Route::Onboarding {
                Route::Dashboard
            } else {
                route
            };
            assert_eq!(Route::resolve(route, true), expected, "{route:?}");
        }
    }
}
