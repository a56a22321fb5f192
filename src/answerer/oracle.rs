//! Asking the model a question against a piece of context.

use std::sync::Arc;

use tracing::error;

use crate::llm::{ChatRequest, LlmClientTrait};
use crate::models::{AnswerKind, UNRESOLVED};

/// Confidence reported for every successful model reply.
///
/// This is a fixed placeholder, not a calibrated probability; it only
/// separates "the model replied" from "the call failed".
pub const SUCCESS_CONFIDENCE: f64 = 0.9;

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions based only on the provided context.";

/// A candidate answer and how much to trust it.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleAnswer {
    pub text: String,
    pub confidence: f64,
}

impl OracleAnswer {
    /// The "N/A" answer with zero confidence.
    pub fn unresolved() -> Self {
        Self {
            text: UNRESOLVED.to_string(),
            confidence: 0.0,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.text == UNRESOLVED
    }
}

/// Answers a question from supplied context.
///
/// Implementations never fail: errors degrade to [`OracleAnswer::unresolved`],
/// which is indistinguishable from the model finding nothing.
pub trait AnswerOracle {
    fn ask(&self, question: &str, context: &str, kind: &AnswerKind) -> OracleAnswer;
}

/// [`AnswerOracle`] backed by a chat model.
pub struct LlmOracle {
    client: Arc<dyn LlmClientTrait>,
}

impl LlmOracle {
    pub fn new(client: Arc<dyn LlmClientTrait>) -> Self {
        Self { client }
    }
}

impl AnswerOracle for LlmOracle {
    fn ask(&self, question: &str, context: &str, kind: &AnswerKind) -> OracleAnswer {
        let prompt = build_prompt(question, context, kind);
        let request = ChatRequest {
            system: SYSTEM_PROMPT,
            prompt: &prompt,
            max_tokens: 100,
        };

        match self.client.complete(&request) {
            Ok(reply) => OracleAnswer {
                text: reply.trim().to_string(),
                confidence: SUCCESS_CONFIDENCE,
            },
            Err(e) => {
                error!("Error answering question with LLM: {e}");
                OracleAnswer::unresolved()
            }
        }
    }
}

fn build_prompt(question: &str, context: &str, kind: &AnswerKind) -> String {
    format!(
        "Answer the following question based ONLY on the provided context.

Context:
{context}

Question: {question}

The answer should be a {kind}. If the information is not available in the context, return 'N/A'.

Answer:",
        kind = kind.as_str()
    )
}
