//! Run configuration defaults and environment fallbacks.

use std::path::PathBuf;
use std::time::Duration;

use crate::processor::DEFAULT_DELAY;

pub const DEFAULT_METADATA_PATH: &str = "pdf-meta.json";
pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";
pub const DEFAULT_OUTPUT_PATH: &str = "answers.json";

/// Everything a batch run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub pdf_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub questions_path: PathBuf,
    pub output_path: PathBuf,
    pub single_question: Option<usize>,
    pub delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pdf_dir: default_pdf_dir(),
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            single_question: None,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Directory searched for `<sha1>.pdf` files when none is given.
///
/// Uses `PDF_DIR` if set, otherwise `~/Downloads/pdfs`.
pub fn default_pdf_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PDF_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join("Downloads").join("pdfs"))
        .unwrap_or_else(|| PathBuf::from("pdfs"))
}

/// Loads `.env` from the working directory if present.
pub fn load_dotenv() {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();
}
