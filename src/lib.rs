pub mod answerer;
pub mod config;
pub mod files;
pub mod index;
pub mod llm;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod pdf;
pub mod prioritizer;
pub mod processor;
pub mod resolver;

pub use index::MetadataIndex;
pub use llm::{LlmClient, LlmClientBuilder, LlmClientTrait, LlmError};
pub use models::{
    AnswerKind, AnswerRecord, AnswerSheet, DocumentId, DocumentMetadata, PageReference, Question,
    TopicFlag,
};
pub use processor::{BatchRunner, QuestionProcessor, QuestionProcessorBuilder, RunError};
