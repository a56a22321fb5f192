mod answer;
mod document;
mod ids;
mod question;

pub use answer::{AnswerRecord, AnswerSheet, PageReference, UNRESOLVED};
pub use document::{DocumentMetadata, TopicFlag};
pub use ids::DocumentId;
pub use question::{AnswerKind, Question};
