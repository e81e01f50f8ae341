use regex::Regex;
use std::sync::OnceLock;

fn help_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // English, Spanish, Portuguese, French, Indonesian/Malay help words.
        Regex::new(r"(?i)\b(help|ayuda|ajuda|aide|bantuan|tolong)\b").expect("valid regex")
    })
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("valid regex"))
}

const BROADCAST_EMOJI: &[&str] = &["📢", "📣", "📡"];
const BROADCAST_HEADERS: &[&str] = &["broadcast:", "[broadcast]", "announcement:"];
const FORWARDED_HEADERS: &[&str] = &["forwarded", "fwd:", "encaminhada"];

pub fn has_help_word(content: &str) -> bool {
    help_word_regex().is_match(content)
}

pub fn has_leading_command(content: &str) -> bool {
    content.trim_start().starts_with('/')
}

pub fn has_question_mark(content: &str) -> bool {
    let trimmed = content.trim();
    trimmed.starts_with('?') || trimmed.ends_with('?')
}

pub fn mentions_agent(content: &str, agent_name: &str) -> bool {
    if agent_name.is_empty() {
        return false;
    }
    let lower = content.to_lowercase();
    lower.contains(&format!("@{}", agent_name.to_lowercase()))
}

/// True if, once URLs are stripped, nothing but whitespace remains.
pub fn is_url_only(content: &str) -> bool {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return false;
    }
    let stripped = url_regex().replace_all(trimmed, "");
    stripped.trim().is_empty()
}

pub fn has_forwarded_header(content: &str) -> bool {
    let lower = content.to_lowercase();
    FORWARDED_HEADERS.iter().any(|h| lower.contains(h))
}

pub fn has_broadcast_marker(content: &str) -> bool {
    let lower = content.to_lowercase();
    BROADCAST_EMOJI.iter().any(|e| content.contains(e))
        || BROADCAST_HEADERS.iter().any(|h| lower.contains(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_help_words_across_languages() {
        assert!(has_help_word("I need help please"));
        assert!(has_help_word("necesito ayuda"));
        assert!(has_help_word("preciso de ajuda"));
        assert!(!has_help_word("hello there"));
    }

    #[test]
    fn url_only_detection() {
        assert!(is_url_only("https://example.com/a/b"));
        assert!(is_url_only("  https://example.com  "));
        assert!(!is_url_only("check this out https://example.com"));
        assert!(!is_url_only(""));
    }

    #[test]
    fn leading_command_and_question_mark() {
        assert!(has_leading_command("/status now"));
        assert!(!has_leading_command("status /status"));
        assert!(has_question_mark("are you there?"));
        assert!(has_question_mark("? anyone home"));
    }
}
