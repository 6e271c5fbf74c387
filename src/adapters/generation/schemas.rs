//! Structured output contracts for the model calls.
//!
//! Each response type has a JSON schema sent to the server for guided
//! decoding, and a decoder that turns anything off-contract into a
//! `PortError::SchemaViolation` carrying the raw text.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ports::PortError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetectionResponse {
    pub is_ambiguous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClarificationResponse {
    #[serde(default)]
    pub original_query: String,
    pub ambiguity_types: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    pub clarifying_question: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VanillaClarificationResponse {
    #[serde(default)]
    pub original_query: String,
    pub clarifying_question: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationResponse {
    pub is_valid: bool,
    #[serde(default)]
    pub explanation: String,
}

pub fn detection_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "is_ambiguous": {"type": "boolean"}
        },
        "required": ["is_ambiguous"]
    })
}

pub fn clarification_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "original_query": {"type": "string"},
            "ambiguity_types": {"type": "array", "items": {"type": "string"}},
            "reasoning": {"type": "string"},
            "clarifying_question": {"type": "string"}
        },
        "required": ["original_query", "ambiguity_types", "reasoning", "clarifying_question"]
    })
}

pub fn vanilla_clarification_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "original_query": {"type": "string"},
            "clarifying_question": {"type": "string"}
        },
        "required": ["original_query", "clarifying_question"]
    })
}

pub fn validation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "is_valid": {"type": "boolean"},
            "explanation": {"type": "string"}
        },
        "required": ["is_valid", "explanation"]
    })
}

/// Decodes a structured response, tolerating a surrounding markdown fence.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, PortError> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| PortError::schema_violation(raw, e.to_string()))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Cleans a free-text reformulation: trims it and drops one pair of
/// surrounding double quotes.
pub fn clean_reformulation(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_json() {
        let parsed: DetectionResponse = decode(r#"{"is_ambiguous": true}"#).unwrap();
        assert!(parsed.is_ambiguous);
    }

    #[test]
    fn decodes_fenced_json() {
        let raw = "```json\n{\"is_valid\": false, \"explanation\": \"too vague\"}\n```";
        let parsed: ValidationResponse = decode(raw).unwrap();
        assert!(!parsed.is_valid);
        assert_eq!(parsed.explanation, "too vague");
    }

    #[test]
    fn off_contract_output_is_a_schema_violation_with_raw_text() {
        let err = decode::<DetectionResponse>("I think it is ambiguous").unwrap_err();
        match err {
            PortError::SchemaViolation { raw, .. } => assert_eq!(raw, "I think it is ambiguous"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn wrong_field_type_is_a_schema_violation() {
        let err = decode::<DetectionResponse>(r#"{"is_ambiguous": "yes"}"#).unwrap_err();
        assert!(matches!(err, PortError::SchemaViolation { .. }));
    }

    #[test]
    fn reformulation_is_trimmed_and_unquoted() {
        assert_eq!(
            clean_reformulation("  \"Where does the Nile River originate?\"\n"),
            "Where does the Nile River originate?"
        );
        assert_eq!(clean_reformulation("plain text"), "plain text");
        assert_eq!(clean_reformulation("\"unbalanced"), "\"unbalanced");
    }

    #[test]
    fn schemas_require_every_field() {
        assert_eq!(
            clarification_schema()["required"].as_array().unwrap().len(),
            4
        );
        assert_eq!(validation_schema()["required"], json!(["is_valid", "explanation"]));
    }
}
