//! Per-question pipeline and the sequential runner over a question file.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::answerer::{AnswerOracle, AnswerSelector, LlmOracle, SHORTCUT_VALUE, metadata_shortcut};
use crate::index::MetadataIndex;
use crate::llm::LlmClientTrait;
use crate::models::{AnswerRecord, AnswerSheet, DocumentId, Question};
use crate::pdf::{PageSource, PdfPageSource, extract_pages};
use crate::prioritizer::prioritize_pages;
use crate::resolver::{ExtractorChain, resolve_document};

/// Default pause between questions.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid question index: {index}. There are {len} questions (valid indices start at 0)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Builder for constructing `QuestionProcessor` instances.
///
/// The index and model client are required; the document directory,
/// page source, extractor chain and oracle can be overridden.
pub struct QuestionProcessorBuilder {
    index: MetadataIndex,
    client: Arc<dyn LlmClientTrait>,
    pdf_dir: PathBuf,
    page_source: Option<Arc<dyn PageSource>>,
    extractor: Option<ExtractorChain>,
    oracle: Option<Box<dyn AnswerOracle>>,
}

impl QuestionProcessorBuilder {
    pub fn new(index: MetadataIndex, client: Arc<dyn LlmClientTrait>) -> Self {
        Self {
            index,
            client,
            pdf_dir: PathBuf::from("."),
            page_source: None,
            extractor: None,
            oracle: None,
        }
    }

    /// Directory holding `<sha1>.pdf` files.
    pub fn pdf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pdf_dir = dir.into();
        self
    }

    pub fn page_source(mut self, source: Arc<dyn PageSource>) -> Self {
        self.page_source = Some(source);
        self
    }

    pub fn extractor(mut self, extractor: ExtractorChain) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn oracle(mut self, oracle: Box<dyn AnswerOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    #[must_use]
    pub fn build(self) -> QuestionProcessor {
        let extractor = self
            .extractor
            .unwrap_or_else(|| ExtractorChain::standard(self.client.clone()));
        let oracle: Box<dyn AnswerOracle> = match self.oracle {
            Some(oracle) => oracle,
            None => Box::new(LlmOracle::new(self.client.clone())),
        };
        let page_source: Arc<dyn PageSource> = match self.page_source {
            Some(source) => source,
            None => Arc::new(PdfPageSource),
        };
        QuestionProcessor {
            index: self.index,
            pdf_dir: self.pdf_dir,
            page_source,
            extractor,
            oracle,
        }
    }
}

/// Turns one question into an answer record.
///
/// Steps: extract a company name, resolve it to a document, read the
/// document's pages, try the metadata shortcut, then run the batched
/// evidence search. Any step that comes up empty ends the pipeline with an
/// unresolved record.
pub struct QuestionProcessor {
    index: MetadataIndex,
    pdf_dir: PathBuf,
    page_source: Arc<dyn PageSource>,
    extractor: ExtractorChain,
    oracle: Box<dyn AnswerOracle>,
}

impl QuestionProcessor {
    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    pub fn company_name(&self, question: &str) -> Option<String> {
        self.extractor.extract(question)
    }

    pub fn resolve(&self, company: &str) -> Option<DocumentId> {
        resolve_document(company, &self.index)
    }

    /// Where the document with `id` is expected to live.
    pub fn document_path(&self, id: &DocumentId) -> PathBuf {
        self.pdf_dir.join(document_file_name(id))
    }

    pub fn process(&self, question: &Question) -> AnswerRecord {
        let text = question.text.as_str();

        let Some(company) = self.company_name(text) else {
            warn!("Could not extract company name from question: {text}");
            return AnswerRecord::unresolved(text);
        };

        let Some(sha1) = self.resolve(&company) else {
            warn!("Could not find PDF for company: {company}");
            return AnswerRecord::unresolved(text);
        };

        let path = self.document_path(&sha1);
        if !path.exists() {
            warn!("PDF file not found: {}", path.display());
            return AnswerRecord::unresolved(text);
        }

        let pages = extract_pages(self.page_source.as_ref(), &path);
        if pages.is_empty() {
            warn!("Could not extract text from PDF: {}", path.display());
            return AnswerRecord::unresolved(text);
        }

        self.answer_from_pages(question, &sha1, &pages)
    }

    fn answer_from_pages(
        &self,
        question: &Question,
        sha1: &DocumentId,
        pages: &[String],
    ) -> AnswerRecord {
        let text = question.text.as_str();

        if let Some(topic) = metadata_shortcut(text, &question.kind, self.index.metadata(sha1)) {
            debug!(?topic, "answered from metadata flag");
            return AnswerRecord::cited(text, SHORTCUT_VALUE, sha1.clone(), 0);
        }

        let priority = prioritize_pages(text, pages);
        debug!(priority_pages = priority.len(), total_pages = pages.len(), "prioritized pages");

        let selection = AnswerSelector::new(self.oracle.as_ref())
            .select(text, &question.kind, pages, &priority);

        match selection.page_index {
            Some(page) => AnswerRecord::cited(text, selection.value, sha1.clone(), page),
            None => AnswerRecord::uncited(text, selection.value),
        }
    }
}

/// Runs the processor over a list of questions, one at a time.
pub struct BatchRunner<'a> {
    processor: &'a QuestionProcessor,
    delay: Duration,
}

impl<'a> BatchRunner<'a> {
    pub fn new(processor: &'a QuestionProcessor) -> Self {
        Self {
            processor,
            delay: DEFAULT_DELAY,
        }
    }

    /// Sets the pause inserted between consecutive questions.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answers every question, preserving input order.
    pub fn run_all(&self, questions: &[Question]) -> AnswerSheet {
        let total = questions.len();
        let mut answers = Vec::with_capacity(total);

        for (i, question) in questions.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            info!(
                "Processing question {}/{}: {}",
                i + 1,
                total,
                truncate_text(&question.text, 50)
            );
            answers.push(self.processor.process(question));
        }

        AnswerSheet::new(answers)
    }

    /// Answers only the question at `index`.
    pub fn run_single(
        &self,
        questions: &[Question],
        index: usize,
    ) -> Result<AnswerSheet, RunError> {
        let question = questions.get(index).ok_or(RunError::IndexOutOfRange {
            index,
            len: questions.len(),
        })?;
        info!("Processing single question: {}", question.text);
        Ok(AnswerSheet::new(vec![self.processor.process(question)]))
    }
}

/// Shortens text for log lines, appending "..." when cut.
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// Expected file name for a document id, relative to the PDF directory.
pub fn document_file_name(id: &DocumentId) -> String {
    format!("{id}.pdf")
}
