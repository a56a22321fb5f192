//! Evidence-grounded answering over a document's pages.
//!
//! This module provides the [`AnswerOracle`] seam used to ask the model a
//! question against a slice of text, the metadata shortcut that skips the
//! model entirely for some yes/no questions, and the [`AnswerSelector`] that
//! batches pages and reconciles candidate answers into one cited answer.

mod oracle;
mod selector;
mod shortcut;

pub use oracle::{AnswerOracle, LlmOracle, OracleAnswer, SUCCESS_CONFIDENCE};
pub use selector::{AnswerSelector, BATCH_SIZE, Selection, batch_context};
pub use shortcut::{SHORTCUT_VALUE, metadata_shortcut};
