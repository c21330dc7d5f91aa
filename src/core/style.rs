//! Style augmentation: splice one of the speaker's idioms into a reply
//!
//! Selection is SHA-256(text) as a big-endian integer modulo the idiom
//! count, so the same text always gets the same idiom as in earlier
//! corpora built from the same cleaned text.

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Idioms characteristic of the target speaker, selection order matters
pub const STYLE_IDIOMS: &[&str] = &[
    // suffixes / greetings
    "bro",
    "brother",
    "mate",
    "legend",
    "my man",
    "champ",
    // shorthand
    "nice man",
    "lmk",
    "np",
    "gm",
    "yikes",
    "let's go",
    "gonna be",
    "haha",
    "lol",
    "shoot you a message",
    "will get you added",
    "got you",
    "yessir",
    "saw you",
    "my bad",
    "enjoy",
];

lazy_static! {
    static ref RE_LEADING_GREETING: Regex =
        Regex::new(r"(?i)^(hey|hi|hello|yo)([,!\s]+)(.*)$").unwrap();
}

/// Deterministic idiom injector
#[derive(Debug, Default, Clone, Copy)]
pub struct StyleAugmenter;

impl StyleAugmenter {
    pub fn new() -> Self {
        Self
    }

    /// Does `text` already use one of the idioms? (substring, case-insensitive)
    pub fn is_styled(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        STYLE_IDIOMS.iter().any(|idiom| lower.contains(idiom))
    }

    /// Idiom chosen for `text`
    pub fn pick_idiom(&self, text: &str) -> &'static str {
        let digest = Sha256::digest(text.as_bytes());
        let n = STYLE_IDIOMS.len() as u64;
        let index = digest.iter().fold(0u64, |acc, b| (acc * 256 + u64::from(*b)) % n);
        STYLE_IDIOMS[index as usize]
    }

    /// Styled variant of `text`, or `text` unchanged when it already has an idiom
    pub fn augment(&self, text: &str) -> String {
        if self.is_styled(text) {
            return text.to_string();
        }

        let idiom = self.pick_idiom(text);

        if let Some(caps) = RE_LEADING_GREETING.captures(text) {
            let rest = caps[3].trim();
            if !rest.is_empty() {
                return format!("{}{}{}, {}", &caps[1], &caps[2], idiom, rest);
            }
        }

        let starts_upper = text.chars().next().map_or(false, char::is_uppercase);
        let idiom = if starts_upper { capitalize(idiom) } else { idiom.to_string() };
        format!("{}, {}", idiom, text)
    }
}

/// First letter upper, rest lower
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
