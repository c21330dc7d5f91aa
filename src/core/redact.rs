//! PII redaction: phone numbers, URLs, known names
//!
//! Order is fixed: phone → URL → name. Placeholders contain no digits and
//! no name fragments, so later patterns never re-match earlier output.

use lazy_static::lazy_static;
use regex::Regex;
use crate::types::CorpusError;

pub const PHONE_PLACEHOLDER: &str = "<PHONE>";
pub const URL_PLACEHOLDER: &str = "<URL>";
pub const NAME_PLACEHOLDER: &str = "<NAME>";

/// First names and nicknames that appear in the exported threads
pub const KNOWN_NAMES: &[&str] = &[
    "Luke", "Cameron", "Cam", "Antony", "Carrie", "Pablo", "Brandon", "Rebekah", "Sasha",
];

lazy_static! {
    static ref RE_PHONE: Regex = Regex::new(r"\+?\d[\d\-\s]{5,}").unwrap();

    static ref RE_URL: Regex = Regex::new(r"https?://\S+").unwrap();

    static ref RE_KNOWN_NAMES: Regex = build_name_regex(KNOWN_NAMES.iter().copied()).unwrap();

    // Lines written entirely in Arabic script are noise for this persona
    static ref RE_ARABIC_ONLY: Regex = Regex::new(r"^[\x{0600}-\x{06FF}\s]+$").unwrap();
}

fn build_name_regex<'a>(names: impl Iterator<Item = &'a str>) -> Result<Regex, regex::Error> {
    let alternation = names
        .filter(|n| !n.trim().is_empty())
        .map(|n| regex::escape(n.trim()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
}

/// PII redactor
#[derive(Debug, Clone)]
pub struct PiiRedactor {
    names: Regex,
}

impl Default for PiiRedactor {
    fn default() -> Self {
        Self::new()
    }
}

impl PiiRedactor {
    /// Redactor with the built-in name list
    pub fn new() -> Self {
        Self { names: RE_KNOWN_NAMES.clone() }
    }

    /// Redactor with the built-in names plus `extra`
    pub fn with_names(extra: &[String]) -> Result<Self, CorpusError> {
        if extra.iter().all(|n| n.trim().is_empty()) {
            return Ok(Self::new());
        }
        let all = KNOWN_NAMES.iter().copied().chain(extra.iter().map(String::as_str));
        Ok(Self { names: build_name_regex(all)? })
    }

    /// Redact `text`; empty string when nothing usable is left
    pub fn redact(&self, text: &str) -> String {
        // Whitespace swallowed by the phone pattern goes with the number
        let text = RE_PHONE.replace_all(text, PHONE_PLACEHOLDER);
        let text = RE_URL.replace_all(&text, URL_PLACEHOLDER);
        let text = self.names.replace_all(&text, NAME_PLACEHOLDER);

        if RE_ARABIC_ONLY.is_match(&text) {
            return String::new();
        }
        text.trim().to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_redacted() {
        let r = PiiRedactor::new();
        assert_eq!(r.redact("text me on +44 7700 900123 thanks"), "text me on <PHONE>thanks");
        assert_eq!(r.redact("555-123-4567"), "<PHONE>");
    }

    #[test]
    fn test_short_numbers_kept() {
        let r = PiiRedactor::new();
        assert_eq!(r.redact("about 50k in 2023"), "about 50k in 2023");
    }

    #[test]
    fn test_url_redacted() {
        let r = PiiRedactor::new();
        assert_eq!(r.redact("book here https://cal.com/x?y=1 bro"), "book here <URL> bro");
    }

    #[test]
    fn test_names_case_insensitive() {
        let r = PiiRedactor::new();
        assert_eq!(r.redact("hey CAMERON, luke here"), "hey <NAME>, <NAME> here");
        assert_eq!(r.redact("Cam's call"), "<NAME>'s call");
    }

    #[test]
    fn test_names_need_word_boundaries() {
        let r = PiiRedactor::new();
        assert_eq!(r.redact("new camera, no scam"), "new camera, no scam");
    }

    #[test]
    fn test_placeholders_not_rematched() {
        let r = PiiRedactor::new();
        let once = r.redact("call 0412 345 678 or see http://a.b Luke");
        assert_eq!(once, "call <PHONE>or see <URL> <NAME>");
        assert_eq!(r.redact(&once), once);
    }

    #[test]
    fn test_arabic_only_rejected() {
        let r = PiiRedactor::new();
        assert_eq!(r.redact("مرحبا بك"), "");
        assert_eq!(r.redact("مرحبا bro"), "مرحبا bro");
    }

    #[test]
    fn test_trimmed() {
        let r = PiiRedactor::new();
        assert_eq!(r.redact("   all good  \n"), "all good");
        assert_eq!(r.redact("   "), "");
    }

    #[test]
    fn test_extra_names() {
        let r = PiiRedactor::with_names(&["Harry".to_string()]).unwrap();
        assert_eq!(r.redact("harry and luke"), "<NAME> and <NAME>");
    }

    #[test]
    fn test_deterministic() {
        let r = PiiRedactor::new();
        let s = "Sasha 07700 900 123 https://x.io";
        assert_eq!(r.redact(s), r.redact(s));
    }
}
