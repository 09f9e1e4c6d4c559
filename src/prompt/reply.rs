//! Reply-request builder for the reply generator.
//!
//! Unlike the catalog prompts this text is sent as the *user* message, with
//! an empty system prompt.

/// Register of the generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Formal,
    Casual,
    Friendly,
    Professional,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Formal, Tone::Casual, Tone::Friendly, Tone::Professional];

    /// Identifier substituted into the request text.
    pub fn id(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Formal => "Formal",
            Tone::Casual => "Casual",
            Tone::Friendly => "Friendly",
            Tone::Professional => "Professional",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tone::Formal => "👔",
            Tone::Casual => "😊",
            Tone::Friendly => "🤗",
            Tone::Professional => "💼",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tone::Formal => "Professional and polite",
            Tone::Casual => "Relaxed and friendly",
            Tone::Friendly => "Warm and approachable",
            Tone::Professional => "Business appropriate",
        }
    }
}

/// Where the reply will be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Email,
    WhatsApp,
    Teams,
    Slack,
    Sms,
    General,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Email,
        Platform::WhatsApp,
        Platform::Teams,
        Platform::Slack,
        Platform::Sms,
        Platform::General,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Platform::Email => "email",
            Platform::WhatsApp => "whatsapp",
            Platform::Teams => "teams",
            Platform::Slack => "slack",
            Platform::Sms => "sms",
            Platform::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Email => "Email",
            Platform::WhatsApp => "WhatsApp",
            Platform::Teams => "Microsoft Teams",
            Platform::Slack => "Slack",
            Platform::Sms => "SMS/Text",
            Platform::General => "General Message",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Platform::Email => "📧",
            Platform::WhatsApp => "💬",
            Platform::Teams => "👥",
            Platform::Slack => "💼",
            Platform::Sms => "📱",
            Platform::General => "✉️",
        }
    }
}

/// Sample messages the user can load with one click.
pub const EXAMPLE_CONTEXTS: [&str; 3] = [
    "Hi, I received your email about the project deadline. Can we discuss extending it by a week?",
    "Thanks for your message! I'd love to meet up this weekend. What time works for you?",
    "I noticed the report you sent. Could you clarify the data in section 3?",
];

/// Build the request text for one reply.
pub fn reply_request(context: &str, tone: Tone, platform: Platform) -> String {
    let tone = tone.id();
    let platform = platform.id();
    format!(
        "Based on the following conversation context, generate an appropriate reply.

Conversation Context:
{context}

Reply Requirements:
- Tone: {tone}
- Platform: {platform}
- Keep it natural and conversational
- Match the {platform} communication style
- Be {tone} in approach

Generate ONLY the reply message, nothing else. No explanations, no labels, just the reply text that can be directly copy-pasted."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_embeds_context_tone_and_platform() {
        let text = reply_request("Can we meet Friday?", Tone::Friendly, Platform::WhatsApp);
        assert!(text.starts_with("Based on the following conversation context"));
        assert!(text.contains("Conversation Context:\nCan we meet Friday?\n\nReply Requirements:"));
        assert!(text.contains("- Tone: friendly\n- Platform: whatsapp\n"));
        assert!(text.contains("- Match the whatsapp communication style\n- Be friendly in approach"));
        assert!(text.ends_with("directly copy-pasted."));
    }

    #[test]
    fn ids_are_lowercase_and_distinct() {
        let tones: std::collections::HashSet<_> = Tone::ALL.iter().map(|t| t.id()).collect();
        let platforms: std::collections::HashSet<_> =
            Platform::ALL.iter().map(|p| p.id()).collect();
        assert_eq!(tones.len(), 4);
        assert_eq!(platforms.len(), 6);
        assert!(tones.iter().chain(platforms.iter()).all(|id| *id == id.to_lowercase()));
    }
}
