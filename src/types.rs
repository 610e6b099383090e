//! Wire types for the enrichment skill.
//!
//! Input records use `recordId`; output records use `recordID`. Both spellings
//! are part of the contract with the calling search pipeline.

use semantic::Embedding;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound batch: `{"values": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    pub values: Vec<InputRecord>,
}

/// One record to enrich.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(rename = "recordId")]
    pub record_id: String,
    pub data: InputData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    pub question: String,
    /// Accepted in any JSON shape but never embedded; see
    /// [`VectorFields::QuestionAndAnswer`](crate::VectorFields).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
}

/// Outbound batch, same length and order as the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResponse {
    pub values: Vec<OutputRecord>,
}

impl EnrichmentResponse {
    /// The initialized, empty accumulator.
    pub fn empty() -> Self {
        Self { values: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.values.iter().filter(|r| r.is_failed()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "recordID")]
    pub record_id: String,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

impl OutputRecord {
    pub fn enriched(record_id: impl Into<String>, data: OutputData) -> Self {
        Self {
            record_id: record_id.into(),
            outcome: RecordOutcome::Enriched { data },
        }
    }

    pub fn failed(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            outcome: RecordOutcome::Failed {
                errors: vec![RecordError {
                    message: message.into(),
                }],
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, RecordOutcome::Failed { .. })
    }

    pub fn data(&self) -> Option<&OutputData> {
        match &self.outcome {
            RecordOutcome::Enriched { data } => Some(data),
            RecordOutcome::Failed { .. } => None,
        }
    }
}

/// A record is either enriched or failed, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordOutcome {
    Enriched { data: OutputData },
    Failed { errors: Vec<RecordError> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    #[serde(rename = "questionVector")]
    pub question_vector: Embedding,
    #[serde(
        rename = "answerVector",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub answer_vector: Option<Embedding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn emb(v: serde_json::Value) -> Embedding {
        Embedding::from_value(v).unwrap()
    }

    #[test]
    fn input_record_uses_record_id_camel_case() {
        let record: InputRecord = serde_json::from_value(json!({
            "recordId": "r1",
            "data": {"question": "what?"}
        }))
        .unwrap();
        assert_eq!(record.record_id, "r1");
        assert_eq!(record.data.question, "what?");
        assert!(record.data.answer.is_none());
    }

    #[test]
    fn answer_of_any_shape_is_accepted() {
        for answer in [json!(7), json!(null), json!({"text": "a"}), json!(["a", "b"])] {
            let record: InputRecord = serde_json::from_value(json!({
                "recordId": "r1",
                "data": {"question": "q", "answer": answer}
            }))
            .unwrap();
            assert_eq!(record.data.question, "q");
        }
    }

    #[test]
    fn record_id_is_required() {
        let result = serde_json::from_value::<InputRecord>(json!({"data": {"question": "q"}}));
        assert!(result.is_err());
    }

    #[test]
    fn enriched_record_serializes_without_errors_key() {
        let out = OutputRecord::enriched(
            "1",
            OutputData {
                question_vector: emb(json!([0.1, 0.2])),
                answer_vector: Some(emb(json!([0.1, 0.2]))),
            },
        );
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({
                "recordID": "1",
                "data": {"questionVector": [0.1, 0.2], "answerVector": [0.1, 0.2]}
            })
        );
    }

    #[test]
    fn question_only_record_omits_answer_vector() {
        let out = OutputRecord::enriched(
            "2",
            OutputData {
                question_vector: emb(json!([1.0])),
                answer_vector: None,
            },
        );
        let value = serde_json::to_value(&out).unwrap();
        assert!(value["data"].get("answerVector").is_none());
    }

    #[test]
    fn failed_record_serializes_without_data_key() {
        let out = OutputRecord::failed("3", "There was an error during processing");
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(
            value,
            json!({
                "recordID": "3",
                "errors": [{"message": "There was an error during processing"}]
            })
        );
        assert!(out.is_failed());
        assert!(out.data().is_none());
    }

    #[test]
    fn output_record_reads_back_both_outcomes() {
        let ok: OutputRecord = serde_json::from_value(json!({
            "recordID": "a",
            "data": {"questionVector": [0.5]}
        }))
        .unwrap();
        assert!(!ok.is_failed());

        let failed: OutputRecord = serde_json::from_value(json!({
            "recordID": "b",
            "errors": [{"message": "nope"}]
        }))
        .unwrap();
        assert!(failed.is_failed());
    }

    #[test]
    fn response_counts() {
        let response = EnrichmentResponse {
            values: vec![
                OutputRecord::failed("x", "e"),
                OutputRecord::enriched(
                    "y",
                    OutputData {
                        question_vector: emb(json!([])),
                        answer_vector: None,
                    },
                ),
            ],
        };
        assert_eq!(response.len(), 2);
        assert_eq!(response.failed_count(), 1);
        assert!(EnrichmentResponse::empty().is_empty());
    }
}
