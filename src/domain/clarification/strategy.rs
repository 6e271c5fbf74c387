//! Clarification generation strategies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the Resolver is asked to produce a clarifying question.
///
/// The ambiguity-type strategies classify the query and ask in one call.
/// `Vanilla` only asks, so the record's ambiguity kinds stay empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClarificationStrategy {
    /// Taxonomy definitions in the prompt, direct answer.
    #[default]
    AtStandard,
    /// Taxonomy definitions plus step-by-step reasoning before the question.
    AtCot,
    /// Question only, no classification.
    Vanilla,
}

impl ClarificationStrategy {
    /// True when the strategy returns ambiguity kinds alongside the question.
    pub fn classifies(&self) -> bool {
        !matches!(self, ClarificationStrategy::Vanilla)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClarificationStrategy::AtStandard => "at_standard",
            ClarificationStrategy::AtCot => "at_cot",
            ClarificationStrategy::Vanilla => "vanilla",
        }
    }
}

impl fmt::Display for ClarificationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClarificationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "at_standard" => Ok(ClarificationStrategy::AtStandard),
            "at_cot" => Ok(ClarificationStrategy::AtCot),
            "vanilla" => Ok(ClarificationStrategy::Vanilla),
            other => Err(format!("unknown clarification strategy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_at_standard() {
        assert_eq!(ClarificationStrategy::default(), ClarificationStrategy::AtStandard);
    }

    #[test]
    fn only_vanilla_skips_classification() {
        assert!(ClarificationStrategy::AtStandard.classifies());
        assert!(ClarificationStrategy::AtCot.classifies());
        assert!(!ClarificationStrategy::Vanilla.classifies());
    }

    #[test]
    fn parses_config_values() {
        assert_eq!("AT_COT".parse::<ClarificationStrategy>(), Ok(ClarificationStrategy::AtCot));
        assert_eq!("vanilla".parse::<ClarificationStrategy>(), Ok(ClarificationStrategy::Vanilla));
        assert!("cot".parse::<ClarificationStrategy>().is_err());
    }

    #[test]
    fn deserializes_snake_case() {
        let strategy: ClarificationStrategy = serde_json::from_str("\"at_cot\"").unwrap();
        assert_eq!(strategy, ClarificationStrategy::AtCot);
    }
}
