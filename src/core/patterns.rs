//! Stateless stage detector: ordered regexes, first match wins
//!
//! Labels a reply on its own text alone. Used when records should carry a
//! stage hint in metadata without the sequential classifier's carry-over.

use lazy_static::lazy_static;
use regex::Regex;
use crate::types::Stage;

lazy_static! {
    static ref RE_GREETING: Regex = Regex::new(
        r"(?i)\b(hey|hi|hello|gm|good (morning|evening|afternoon))\b"
    ).unwrap();

    static ref RE_RAPPORT: Regex = Regex::new(
        r"(?i)where (are|r) you|how (has|'s|s) your day|what (brought|brings) you|goal|outcome"
    ).unwrap();

    static ref RE_Q1: Regex = Regex::new(
        r"(?i)understand|familiar|well-versed|how much do you know.*(company|services)"
    ).unwrap();

    static ref RE_Q2: Regex = Regex::new(
        r"(?i)(sparked|spark|what).*interest|why.*interest|what.*brought.*services"
    ).unwrap();

    static ref RE_Q3: Regex = Regex::new(
        r"(?i)portfolio .*size|portfolio worth|how big is.*portfolio|invest(ing|ed)?.*\$|current investment portfolio"
    ).unwrap();

    static ref RE_Q4: Regex = Regex::new(
        r"(?i)biggest (challenge|struggle)|pain point|what.*challenges.*invest"
    ).unwrap();

    static ref RE_QUALIFIED: Regex = Regex::new(
        r"(?i)congratulations|schedule|booking link|book.*consult"
    ).unwrap();

    static ref RE_NURTURE: Regex = Regex::new(
        r"(?i)not qualified|faq|check in (a few|couple) days"
    ).unwrap();

    /// Tested top to bottom
    static ref STAGE_PATTERNS: Vec<(&'static Regex, Stage)> = vec![
        (&*RE_GREETING, Stage::Greeting),
        (&*RE_RAPPORT, Stage::RapportBuilding),
        (&*RE_Q1, Stage::AnsweringQ1),
        (&*RE_Q2, Stage::AnsweringQ2),
        (&*RE_Q3, Stage::AnsweringQ3),
        (&*RE_Q4, Stage::AnsweringQ4),
        (&*RE_QUALIFIED, Stage::Qualified),
        (&*RE_NURTURE, Stage::Nurture),
    ];
}

/// Label used when nothing matches
pub const PATTERN_DEFAULT_STAGE: Stage = Stage::Nurture;

#[derive(Debug, Default, Clone, Copy)]
pub struct PatternStageDetector;

impl PatternStageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the stage of a single reply
    pub fn detect(&self, text: &str) -> Stage {
        STAGE_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(text))
            .map(|(_, stage)| *stage)
            .unwrap_or(PATTERN_DEFAULT_STAGE)
    }
}
