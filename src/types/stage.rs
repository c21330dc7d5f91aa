//! Conversation stage definitions

use serde::{Deserialize, Serialize};

/// Where in the scripted qualification flow a target-speaker turn falls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Opening message, initial state of every conversation
    #[serde(rename = "greeting")]
    Greeting,
    /// Small talk after the greeting
    #[serde(rename = "rapport_building")]
    RapportBuilding,
    /// Familiarity with the company and its services
    #[serde(rename = "answering_Q1")]
    AnsweringQ1,
    /// What sparked their interest
    #[serde(rename = "answering_Q2")]
    AnsweringQ2,
    /// Portfolio size
    #[serde(rename = "answering_Q3")]
    AnsweringQ3,
    /// Biggest challenge
    #[serde(rename = "answering_Q4")]
    AnsweringQ4,
    /// Booking offered, never carried into the next turn
    #[serde(rename = "qualified")]
    Qualified,
    /// Follow-up after qualification or for leads that do not fit
    #[serde(rename = "nurture")]
    Nurture,
}

impl Stage {
    /// Every stage, in flow order
    pub const ALL: [Stage; 8] = [
        Stage::Greeting,
        Stage::RapportBuilding,
        Stage::AnsweringQ1,
        Stage::AnsweringQ2,
        Stage::AnsweringQ3,
        Stage::AnsweringQ4,
        Stage::Qualified,
        Stage::Nurture,
    ];

    /// Machine-readable label, as written to the corpus
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Greeting => "greeting",
            Stage::RapportBuilding => "rapport_building",
            Stage::AnsweringQ1 => "answering_Q1",
            Stage::AnsweringQ2 => "answering_Q2",
            Stage::AnsweringQ3 => "answering_Q3",
            Stage::AnsweringQ4 => "answering_Q4",
            Stage::Qualified => "qualified",
            Stage::Nurture => "nurture",
        }
    }

    /// Parse a label produced by [`Stage::as_str`]
    pub fn from_label(label: &str) -> Option<Stage> {
        Stage::ALL.iter().copied().find(|s| s.as_str() == label)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Greeting
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
