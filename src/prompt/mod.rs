//! Prompt texts and builders.
//!
//! * [`catalog`]: system prompts for conversation, grammar and general chat.
//! * [`scenario`]: practice scenarios and their random opening questions.
//! * [`reply`]: request text for the reply generator.
//! * [`clean_correction`]: trims a grammar-checker reply to one sentence.

pub mod catalog;
pub mod reply;
pub mod scenario;

pub use catalog::{conversation, GENERAL, GRAMMAR};
pub use reply::{reply_request, Platform, Tone};
pub use scenario::{random_opening_question, Scenario, SCENARIOS};

use std::sync::OnceLock;

use regex::Regex;

fn label_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(Corrected Sentence:|Corrected:|Here's the correction:|The corrected sentence is:)\s*",
        )
        .expect("static regex")
    })
}

fn edge_quote() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^["']|["']$"#).expect("static regex"))
}

/// Reduce a grammar-checker reply to the bare corrected sentence.
///
/// Trims, strips one leading label such as `Corrected:`, strips one leading
/// and one trailing quote, then keeps only the first line.  The prefix list
/// is heuristic; an unlisted label passes through unchanged.
pub fn clean_correction(response: &str) -> String {
    let text = response.trim();
    let text = label_prefix().replace(text, "");
    let text = edge_quote().replace_all(&text, "");
    text.lines().next().unwrap_or("").trim().to_string()
}
