//! Resume blob - the serialized form of a [`QueryRecord`].
//!
//! A blob is a flat JSON object holding every record field. Enums travel as
//! their upper-case tags and timestamps as ISO-8601 strings. Callers in
//! stateless mode store the blob between requests and hand it back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::ValidationError;

use super::record::QueryRecord;
use super::status::QueryStatus;

/// Errors raised while encoding or decoding a resume blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    #[error("Failed to encode query record: {0}")]
    Encode(String),

    #[error("Resume blob is not a valid query record: {0}")]
    Decode(String),

    #[error("Resume blob is inconsistent: {0}")]
    Inconsistent(#[from] ValidationError),
}

/// Opaque, serializable snapshot of a query record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeBlob(Map<String, Value>);

impl ResumeBlob {
    /// Wraps an already-decoded JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parses a blob from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, BlobError> {
        serde_json::from_str(text).map_err(|e| BlobError::Decode(e.to_string()))
    }

    /// Renders the blob as compact JSON text.
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Status tag stored in the blob, if it is present and recognised.
    pub fn status(&self) -> Option<QueryStatus> {
        self.0
            .get("status")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

impl QueryRecord {
    /// Serializes this record into a resume blob.
    pub fn to_blob(&self) -> Result<ResumeBlob, BlobError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(ResumeBlob(map)),
            Ok(other) => Err(BlobError::Encode(format!(
                "expected a JSON object, got {}",
                other
            ))),
            Err(e) => Err(BlobError::Encode(e.to_string())),
        }
    }

    /// Restores a record from a resume blob, rejecting blobs whose fields
    /// contradict each other.
    pub fn from_blob(blob: &ResumeBlob) -> Result<Self, BlobError> {
        let record: QueryRecord = serde_json::from_value(Value::Object(blob.0.clone()))
            .map_err(|e| BlobError::Decode(e.to_string()))?;
        record.check_invariants()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clarification::AmbiguityKind;
    use proptest::prelude::*;

    fn paused_record() -> QueryRecord {
        let mut record = QueryRecord::new("Tell me about the source of Nile.");
        record.begin_detection().unwrap();
        record.record_detection(true).unwrap();
        record
            .record_clarification(
                vec![AmbiguityKind::Lexical, AmbiguityKind::What],
                None,
                "Which meaning of 'source'?".to_string(),
            )
            .unwrap();
        record
    }

    #[test]
    fn blob_is_flat_with_string_tags() {
        let blob = paused_record().to_blob().unwrap();
        let map = blob.as_map();
        assert_eq!(map["status"], "AWAITING_CLARIFICATION");
        assert_eq!(map["ambiguity_kinds"], serde_json::json!(["LEXICAL", "WHAT"]));
        assert_eq!(map["is_ambiguous"], true);
        assert!(map["created_at"].as_str().unwrap().ends_with('Z'));
        assert!(map["error_message"].is_null());
        assert_eq!(blob.status(), Some(QueryStatus::AwaitingClarification));
    }

    #[test]
    fn round_trip_is_lossless() {
        let record = paused_record();
        let blob = record.to_blob().unwrap();
        let restored = QueryRecord::from_blob(&blob).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.to_blob().unwrap(), blob);
    }

    #[test]
    fn json_text_round_trip() {
        let blob = paused_record().to_blob().unwrap();
        let parsed = ResumeBlob::from_json_str(&blob.to_json_string()).unwrap();
        assert_eq!(parsed, blob);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut map = paused_record().to_blob().unwrap().into_map();
        map.insert("surprise".to_string(), Value::Bool(true));
        let err = QueryRecord::from_blob(&ResumeBlob::from_map(map)).unwrap_err();
        assert!(matches!(err, BlobError::Decode(_)));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut map = paused_record().to_blob().unwrap().into_map();
        map.insert("status".to_string(), Value::from("PONDERING"));
        let blob = ResumeBlob::from_map(map);
        assert_eq!(blob.status(), None);
        assert!(matches!(
            QueryRecord::from_blob(&blob),
            Err(BlobError::Decode(_))
        ));
    }

    #[test]
    fn inconsistent_blob_is_rejected() {
        let mut map = paused_record().to_blob().unwrap().into_map();
        map.insert("clarifying_question".to_string(), Value::Null);
        let err = QueryRecord::from_blob(&ResumeBlob::from_map(map)).unwrap_err();
        assert!(matches!(err, BlobError::Inconsistent(_)));
    }

    #[test]
    fn none_with_other_kinds_is_rejected() {
        let mut map = paused_record().to_blob().unwrap().into_map();
        map.insert(
            "ambiguity_kinds".to_string(),
            serde_json::json!(["NONE", "WHO"]),
        );
        let err = QueryRecord::from_blob(&ResumeBlob::from_map(map)).unwrap_err();
        assert!(matches!(err, BlobError::Inconsistent(_)));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        for field in ["query_id", "clarification_attempts"] {
            let mut map = paused_record().to_blob().unwrap().into_map();
            map.remove(field);
            let err = QueryRecord::from_blob(&ResumeBlob::from_map(map)).unwrap_err();
            assert!(matches!(err, BlobError::Decode(_)), "{field} should be required");
        }
    }

    proptest! {
        #[test]
        fn arbitrary_queries_survive_the_blob(
            query in "\\PC{1,80}",
            question in "\\PC{1,80}",
            answer in "\\PC{0,80}",
        ) {
            let mut record = QueryRecord::new(query);
            record.begin_detection().unwrap();
            record.record_detection(true).unwrap();
            record.record_clarification(Vec::new(), None, question).unwrap();
            record.submit_clarification(answer).unwrap();

            let blob = record.to_blob().unwrap();
            let text = blob.to_json_string();
            let wire = ResumeBlob::from_json_str(&text).unwrap();
            let restored = QueryRecord::from_blob(&wire).unwrap();
            prop_assert_eq!(restored, record);
        }
    }
}
