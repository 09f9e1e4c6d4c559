//! Home screen: greeting, profile summary and the practice modes.

use crate::profile::Profile;
use crate::router::Route;

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub route: Route,
}

pub const FEATURES: [Feature; 5] = [
    Feature {
        title: "Voice Chat",
        description: "Practice speaking English with AI voice responses",
        icon: "🎤",
        route: Route::VoiceChat,
    },
    Feature {
        title: "Text Chat",
        description: "Have natural text conversations in English",
        icon: "💬",
        route: Route::TextChat,
    },
    Feature {
        title: "Conversations",
        description: "Practice real-life scenarios in different settings",
        icon: "👥",
        route: Route::Conversations,
    },
    Feature {
        title: "Grammar Check",
        description: "Improve your grammar with instant corrections",
        icon: "✏️",
        route: Route::GrammarCheck,
    },
    Feature {
        title: "Reply Generator",
        description: "Generate smart replies for any conversation",
        icon: "⚡",
        route: Route::ReplyGenerator,
    },
];

pub const TIPS: [&str; 5] = [
    "Practice daily for at least 15 minutes",
    "Don't be afraid to make mistakes - they help you learn",
    "Try different scenarios to expand your vocabulary",
    "Use voice chat to improve pronunciation",
    "Review grammar corrections to understand patterns",
];

/// Read-only view over the current profile.
pub struct Dashboard<'a> {
    profile: &'a Profile,
}

impl<'a> Dashboard<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    pub fn greeting(&self) -> String {
        format!("Welcome back, {}! 👋", self.profile.name)
    }

    pub fn provider_name(&self) -> &'static str {
        self.profile.ai_provider.display_name()
    }

    pub fn native_language(&self) -> &str {
        &self.profile.native_language
    }

    pub fn features(&self) -> &'static [Feature] {
        &FEATURES
    }
}
