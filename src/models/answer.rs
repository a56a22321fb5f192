use serde::{Deserialize, Serialize};

use super::ids::DocumentId;

/// Value reported when no answer could be found.
pub const UNRESOLVED: &str = "N/A";

/// Page of a document that supports an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReference {
    pub pdf_sha1: DocumentId,
    pub page_index: usize,
}

/// Final answer for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_text: String,
    pub value: String,
    pub references: Vec<PageReference>,
}

impl AnswerRecord {
    /// Creates an answer backed by a single page.
    pub fn cited(
        question_text: impl Into<String>,
        value: impl Into<String>,
        pdf_sha1: DocumentId,
        page_index: usize,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            value: value.into(),
            references: vec![PageReference {
                pdf_sha1,
                page_index,
            }],
        }
    }

    /// Creates an answer with no supporting page.
    pub fn uncited(question_text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            value: value.into(),
            references: Vec::new(),
        }
    }

    /// Creates the "N/A" record returned when the pipeline gives up.
    pub fn unresolved(question_text: impl Into<String>) -> Self {
        Self::uncited(question_text, UNRESOLVED)
    }

    /// Returns true unless the value is the "N/A" sentinel.
    pub fn is_resolved(&self) -> bool {
        self.value != UNRESOLVED
    }
}

/// Output file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub answers: Vec<AnswerRecord>,
}

impl AnswerSheet {
    pub fn new(answers: Vec<AnswerRecord>) -> Self {
        Self { answers }
    }
}
