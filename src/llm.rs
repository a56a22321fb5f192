/// Chat-completion HTTP client module.
///
/// This module provides a blocking client for OpenAI-compatible chat APIs,
/// the error type it reports, and the trait the pipeline depends on so tests
/// can substitute a scripted model.
mod client;

pub use client::{ChatRequest, LlmClient, LlmClientBuilder, LlmClientTrait, LlmError};
