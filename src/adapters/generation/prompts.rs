//! Prompt templates for the LLM-backed detector and resolver.

use crate::domain::clarification::{format_definitions, join_kinds, AmbiguityKind, ClarificationStrategy};
use crate::ports::ClarificationExchange;

pub const DETECTION_SYSTEM: &str = "You detect ambiguity in queries sent to an information-seeking system.

A query is clear when one interpretation is clearly the most reasonable and it can be answered without important assumptions.
A query is ambiguous when two or more reasonable interpretations would lead to materially different answers and the query does not say which one is meant. Missing constraints that change the answer (which entity, timeframe, location, version, unit, or sense of a word) count as ambiguity.

Return only a JSON object of the form {\"is_ambiguous\": true|false}.";

pub fn detection_user(query: &str) -> String {
    format!(
        "Decide whether the following query is ambiguous or clear.\n\n\
         Example: \"What is the capital of France?\" -> {{\"is_ambiguous\": false}}\n\
         Example: \"Tell me about the source of Nile.\" -> {{\"is_ambiguous\": true}}\n\
         Example: \"When did he land on the moon?\" -> {{\"is_ambiguous\": true}}\n\n\
         Query: \"{}\"\nOutput:",
        query
    )
}

const QUESTION_RULES: &str = "Ask exactly ONE short clarifying question:
- no compound questions joined by \"or\" / \"and\"
- natural and conversational
- aimed at the most important missing information";

/// System prompt for clarification generation under `strategy`.
pub fn clarification_system(strategy: ClarificationStrategy) -> String {
    match strategy {
        ClarificationStrategy::AtStandard => format!(
            "You analyze ambiguous queries sent to an information-seeking system and ask clarifying questions.\n\n\
             Ambiguity types:\n\n{}\n\n{}\n\
             If no type applies, report [\"NONE\"].\n\n\
             Return only a JSON object with the fields original_query, ambiguity_types (list of type tags), \
             reasoning (one short sentence) and clarifying_question.",
            format_definitions(),
            QUESTION_RULES
        ),
        ClarificationStrategy::AtCot => format!(
            "You analyze ambiguous queries sent to an information-seeking system and ask clarifying questions.\n\n\
             Ambiguity types:\n\n{}\n\n\
             Work step by step: identify which types apply, explain why in the reasoning field, \
             plan how to resolve them, then write the question.\n\n{}\n\
             If no type applies, report [\"NONE\"].\n\n\
             Return only a JSON object with the fields original_query, ambiguity_types (list of type tags), \
             reasoning and clarifying_question.",
            format_definitions(),
            QUESTION_RULES
        ),
        ClarificationStrategy::Vanilla => format!(
            "You ask clarifying questions about ambiguous queries sent to an information-seeking system.\n\n{}\n\n\
             Return only a JSON object with the fields original_query and clarifying_question.",
            QUESTION_RULES
        ),
    }
}

pub fn clarification_user(query: &str) -> String {
    format!(
        "Ask the clarifying question that best reveals what the user wants. \
         A query can be ambiguous in several ways at once.\n\nQuery: \"{}\"\nOutput:",
        query
    )
}

pub const VALIDATION_SYSTEM: &str = "You judge whether a user's answer to a clarifying question resolves the main ambiguity of their original query.

Consider the original query, the ambiguity types, the question that was asked and the user's answer. The answer is valid only if it supplies the information needed to settle the primary ambiguity.

Return only a JSON object with the fields is_valid (boolean) and explanation (one sentence).";

pub const REFORMULATION_SYSTEM: &str = "You rewrite ambiguous queries into clear ones using the user's clarification.

The rewritten query must carry the clarified intent, keep the original goal, stand on its own without the conversation, and read naturally.

Reply with the rewritten query only: no quotes, labels or explanation.";

fn describe_kinds(kinds: &[AmbiguityKind]) -> String {
    if kinds.is_empty() {
        "unspecified".to_string()
    } else {
        join_kinds(kinds)
    }
}

/// Shared user prompt body for validation and reformulation.
pub fn exchange_user(exchange: &ClarificationExchange, instruction: &str) -> String {
    format!(
        "Original query: \"{}\"\n\nAmbiguity type(s): {}\n\nClarifying question: \"{}\"\n\nUser's answer: \"{}\"\n\n{}",
        exchange.query,
        describe_kinds(&exchange.kinds),
        exchange.question,
        exchange.answer,
        instruction
    )
}

pub const VALIDATION_INSTRUCTION: &str =
    "Does the answer resolve the ambiguity? Respond with JSON containing is_valid and explanation.";

pub const REFORMULATION_INSTRUCTION: &str =
    "Rewrite the original query so that it is unambiguous. Output only the rewritten query.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_strategies_embed_definitions() {
        for strategy in [ClarificationStrategy::AtStandard, ClarificationStrategy::AtCot] {
            let prompt = clarification_system(strategy);
            assert!(prompt.contains("**LEXICAL**"));
            assert!(prompt.contains("ambiguity_types"));
        }
        let vanilla = clarification_system(ClarificationStrategy::Vanilla);
        assert!(!vanilla.contains("ambiguity_types"));
    }

    #[test]
    fn exchange_prompt_lists_all_parts() {
        let exchange = ClarificationExchange {
            query: "Tell me about the source of Nile.".to_string(),
            kinds: vec![AmbiguityKind::Lexical, AmbiguityKind::What],
            question: "Which source?".to_string(),
            answer: "where it starts".to_string(),
        };
        let prompt = exchange_user(&exchange, VALIDATION_INSTRUCTION);
        assert!(prompt.contains("Ambiguity type(s): LEXICAL, WHAT"));
        assert!(prompt.contains("User's answer: \"where it starts\""));
    }

    #[test]
    fn missing_kinds_are_described_as_unspecified() {
        let exchange = ClarificationExchange {
            query: "q".to_string(),
            kinds: Vec::new(),
            question: "?".to_string(),
            answer: "a".to_string(),
        };
        assert!(exchange_user(&exchange, "").contains("Ambiguity type(s): unspecified"));
    }
}
