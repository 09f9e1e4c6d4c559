//! Emphasis markup in tutor replies.
//!
//! Replies mark correct forms as `**text**` and quote the learner's mistakes
//! as `"text"`.  [`format_message`] turns a reply into display spans without
//! touching the stored message.

use std::sync::OnceLock;

use regex::Regex;

/// One run of display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Strong(String),
}

fn bold_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("static regex"))
}

fn quote_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("static regex"))
}

/// Split `text` into plain and emphasised spans.
///
/// `**X**` becomes `Strong(X)` with the asterisks dropped.  Then, in the
/// remaining plain runs only, `"X"` becomes `Strong("\"X\"")` with the quotes
/// kept.  Matches are non-overlapping, left to right.
pub fn format_message(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    for span in split_on(text, bold_pattern(), |caps| caps[1].to_string()) {
        match span {
            Span::Plain(plain) => {
                spans.extend(split_on(&plain, quote_pattern(), |caps| caps[0].to_string()))
            }
            strong => spans.push(strong),
        }
    }
    spans
}

fn split_on(
    text: &str,
    pattern: &Regex,
    strong_text: impl Fn(&regex::Captures<'_>) -> String,
) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::Plain(text[last..whole.start()].to_string()));
        }
        spans.push(Span::Strong(strong_text(&caps)));
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::Plain(text[last..].to_string()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Span {
        Span::Plain(s.into())
    }
    fn strong(s: &str) -> Span {
        Span::Strong(s.into())
    }

    #[test]
    fn bold_markers_are_stripped() {
        assert_eq!(
            format_message("Say **it goes** here"),
            vec![plain("Say "), strong("it goes"), plain(" here")]
        );
    }

    #[test]
    fn quotes_are_kept_inside_emphasis() {
        assert_eq!(
            format_message(r#"You said "it go" before"#),
            vec![plain("You said "), strong("\"it go\""), plain(" before")]
        );
    }

    #[test]
    fn mixed_reply_from_tutor() {
        let spans = format_message(
            r#"Small correction: **it goes to the airport** instead of "it go to airport". Which bus?"#,
        );
        assert_eq!(
            spans,
            vec![
                plain("Small correction: "),
                strong("it goes to the airport"),
                plain(" instead of "),
                strong("\"it go to airport\""),
                plain(". Which bus?"),
            ]
        );
    }

    #[test]
    fn quotes_inside_bold_are_not_reprocessed() {
        assert_eq!(
            format_message(r#"**say "hello"** now"#),
            vec![strong("say \"hello\""), plain(" now")]
        );
    }

    #[test]
    fn unmatched_markers_stay_plain() {
        assert_eq!(format_message("a ** b"), vec![plain("a ** b")]);
        assert_eq!(format_message(r#"one " quote"#), vec![plain("one \" quote")]);
        assert_eq!(format_message("****"), vec![plain("****")]);
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(format_message("").is_empty());
    }

    #[test]
    fn plain_text_is_one_span() {
        let spans = format_message("Nothing to emphasise.");
        assert_eq!(spans, vec![plain("Nothing to emphasise.")]);
    }
}
