//! Ambiguity taxonomy.
//!
//! A closed set of ambiguity kinds plus the `None` sentinel. Classification
//! output is validated against this set; anything outside it is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One tag from the closed ambiguity taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmbiguityKind {
    Unfamiliar,
    Contradiction,
    Lexical,
    Semantic,
    Reference,
    Who,
    When,
    Where,
    What,
    /// Sentinel for a clear query. Never combined with another kind.
    None,
}

impl AmbiguityKind {
    /// Every real ambiguity kind, in canonical order. Excludes `None`.
    pub const ALL: [AmbiguityKind; 9] = [
        AmbiguityKind::Unfamiliar,
        AmbiguityKind::Contradiction,
        AmbiguityKind::Lexical,
        AmbiguityKind::Semantic,
        AmbiguityKind::Reference,
        AmbiguityKind::Who,
        AmbiguityKind::When,
        AmbiguityKind::Where,
        AmbiguityKind::What,
    ];

    /// Wire tag of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbiguityKind::Unfamiliar => "UNFAMILIAR",
            AmbiguityKind::Contradiction => "CONTRADICTION",
            AmbiguityKind::Lexical => "LEXICAL",
            AmbiguityKind::Semantic => "SEMANTIC",
            AmbiguityKind::Reference => "REFERENCE",
            AmbiguityKind::Who => "WHO",
            AmbiguityKind::When => "WHEN",
            AmbiguityKind::Where => "WHERE",
            AmbiguityKind::What => "WHAT",
            AmbiguityKind::None => "NONE",
        }
    }

    /// One-line definition used when describing the taxonomy to a model.
    pub fn explanation(&self) -> &'static str {
        match self {
            AmbiguityKind::Unfamiliar => "Query contains unfamiliar entities or facts",
            AmbiguityKind::Contradiction => "Query contains self-contradictions",
            AmbiguityKind::Lexical => "Query contains terms with multiple meanings",
            AmbiguityKind::Semantic => "Query lacks context, leading to multiple interpretations",
            AmbiguityKind::Reference => {
                "Query contains references (pronouns, temporal, spatial or object) with multiple possible antecedents"
            }
            AmbiguityKind::Who => "Query is missing information about the person or group involved",
            AmbiguityKind::When => "Query is missing information about the time or period meant",
            AmbiguityKind::Where => "Query is missing information about the place meant",
            AmbiguityKind::What => "Query is missing information about the object or topic meant",
            AmbiguityKind::None => "Query is clear and unambiguous",
        }
    }

    /// Canonical example query for the kind.
    pub fn example(&self) -> &'static str {
        match self {
            AmbiguityKind::Unfamiliar => "Find the price of Samsung Chromecast.",
            AmbiguityKind::Contradiction => {
                "Output 'X' if the sentence contains [category withhold] and 'Y' otherwise. The critic is in the restaurant.>X. The butterfly is in the river.>Y. The boar is in the theatre.>Y."
            }
            AmbiguityKind::Lexical => "Tell me about the source of Nile.",
            AmbiguityKind::Semantic => "When did he land on the moon?",
            AmbiguityKind::Reference => "John told Mark he won the race.",
            AmbiguityKind::Who => "Suggest me some gifts for my mother.",
            AmbiguityKind::When => "How many goals did Argentina score in the World Cup?",
            AmbiguityKind::Where => "What is the best time to visit the capital?",
            AmbiguityKind::What => "How much does the subscription cost?",
            AmbiguityKind::None => "What is 2 + 2?",
        }
    }

    /// True for the `None` sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, AmbiguityKind::None)
    }
}

impl fmt::Display for AmbiguityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmbiguityKind {
    type Err = TaxonomyError;

    /// Parses a wire tag. Matching ignores ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase();
        AmbiguityKind::ALL
            .iter()
            .chain(std::iter::once(&AmbiguityKind::None))
            .find(|kind| kind.as_str() == tag)
            .copied()
            .ok_or_else(|| TaxonomyError::UnknownKind(s.to_string()))
    }
}

/// Reasons a classification result falls outside the taxonomy contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("unknown ambiguity kind '{0}'")]
    UnknownKind(String),

    #[error("classification returned no ambiguity kinds")]
    Empty,

    #[error("NONE cannot be combined with other ambiguity kinds")]
    NoneWithOthers,
}

/// Parses raw classification tags into an ordered, duplicate-free set.
///
/// The result is either a non-empty list of real kinds or exactly `[None]`.
/// Unknown tags and `NONE` mixed with other kinds are rejected, never repaired.
pub fn parse_kinds<S: AsRef<str>>(raw: &[S]) -> Result<Vec<AmbiguityKind>, TaxonomyError> {
    let mut kinds: Vec<AmbiguityKind> = Vec::with_capacity(raw.len());
    for tag in raw {
        let kind: AmbiguityKind = tag.as_ref().parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    check_kind_set(&kinds)?;
    Ok(kinds)
}

/// Checks the set-level invariants of an already-typed kind list.
pub fn check_kind_set(kinds: &[AmbiguityKind]) -> Result<(), TaxonomyError> {
    if kinds.is_empty() {
        return Err(TaxonomyError::Empty);
    }
    if kinds.len() > 1 && kinds.iter().any(AmbiguityKind::is_sentinel) {
        return Err(TaxonomyError::NoneWithOthers);
    }
    Ok(())
}

/// Renders the taxonomy as a bullet list of definitions and examples.
pub fn format_definitions() -> String {
    AmbiguityKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "- **{}**: {}\n  Example: \"{}\"",
                kind.as_str(),
                kind.explanation(),
                kind.example()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins kinds into a comma separated list of wire tags.
pub fn join_kinds(kinds: &[AmbiguityKind]) -> String {
    kinds
        .iter()
        .map(AmbiguityKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_tag() {
        for kind in AmbiguityKind::ALL {
            assert_eq!(kind.as_str().parse::<AmbiguityKind>(), Ok(kind));
        }
        assert_eq!("NONE".parse::<AmbiguityKind>(), Ok(AmbiguityKind::None));
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(" lexical ".parse::<AmbiguityKind>(), Ok(AmbiguityKind::Lexical));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            "SARCASM".parse::<AmbiguityKind>(),
            Err(TaxonomyError::UnknownKind("SARCASM".to_string()))
        );
    }

    #[test]
    fn parse_kinds_keeps_order_and_drops_duplicates() {
        let kinds = parse_kinds(&["SEMANTIC", "LEXICAL", "SEMANTIC"]).unwrap();
        assert_eq!(kinds, vec![AmbiguityKind::Semantic, AmbiguityKind::Lexical]);
    }

    #[test]
    fn parse_kinds_accepts_lone_none() {
        assert_eq!(parse_kinds(&["NONE"]).unwrap(), vec![AmbiguityKind::None]);
    }

    #[test]
    fn parse_kinds_rejects_none_with_others() {
        assert_eq!(
            parse_kinds(&["NONE", "LEXICAL"]),
            Err(TaxonomyError::NoneWithOthers)
        );
    }

    #[test]
    fn parse_kinds_rejects_empty_list() {
        let empty: [&str; 0] = [];
        assert_eq!(parse_kinds(&empty), Err(TaxonomyError::Empty));
    }

    #[test]
    fn parse_kinds_rejects_any_unknown_member() {
        assert!(matches!(
            parse_kinds(&["LEXICAL", "VAGUE"]),
            Err(TaxonomyError::UnknownKind(tag)) if tag == "VAGUE"
        ));
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&vec![AmbiguityKind::Who, AmbiguityKind::None]).unwrap();
        assert_eq!(json, r#"["WHO","NONE"]"#);
    }

    #[test]
    fn definitions_cover_every_real_kind_but_not_none() {
        let text = format_definitions();
        for kind in AmbiguityKind::ALL {
            assert!(text.contains(&format!("**{}**", kind.as_str())));
        }
        assert!(!text.contains("**NONE**"));
        assert!(text.contains("Tell me about the source of Nile."));
    }

    #[test]
    fn join_kinds_renders_tags() {
        assert_eq!(
            join_kinds(&[AmbiguityKind::Lexical, AmbiguityKind::When]),
            "LEXICAL, WHEN"
        );
    }
}
