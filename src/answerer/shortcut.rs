//! Answering yes/no questions straight from metadata flags.

use crate::models::{AnswerKind, DocumentMetadata, TopicFlag};

/// Value returned when the shortcut fires.
pub const SHORTCUT_VALUE: &str = "False";

/// Returns the topic whose absent flag answers the question with "False".
///
/// Fires only for boolean questions phrased with "did" that mention a flagged
/// topic whose flag is false or missing. A flag set to true never fires.
pub fn metadata_shortcut(
    question: &str,
    kind: &AnswerKind,
    metadata: Option<&DocumentMetadata>,
) -> Option<TopicFlag> {
    if *kind != AnswerKind::Boolean {
        return None;
    }

    let question_lower = question.to_lowercase();
    if !question_lower.contains("did") {
        return None;
    }

    TopicFlag::ALL.into_iter().find(|&topic| {
        question_lower.contains(topic.phrase())
            && !metadata.and_then(|m| m.flag(topic)).unwrap_or(false)
    })
}
