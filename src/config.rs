//! Enrichment behavior settings.

use serde::{Deserialize, Serialize};

/// Which vectors each enriched record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorFields {
    /// `questionVector` only: one provider call per record.
    Question,
    /// `questionVector` and `answerVector`: two provider calls per record.
    ///
    /// Both calls embed the `question` text. An incoming `answer` field is
    /// ignored and a warning is logged when it differs from the question.
    #[default]
    QuestionAndAnswer,
}

impl VectorFields {
    pub fn calls_per_record(self) -> usize {
        match self {
            VectorFields::Question => 1,
            VectorFields::QuestionAndAnswer => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub fields: VectorFields,
}

impl EnrichmentConfig {
    pub fn new(fields: VectorFields) -> Self {
        Self { fields }
    }
}
