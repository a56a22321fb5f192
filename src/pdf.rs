//! Per-page text extraction from PDF files.

use std::path::Path;

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to load PDF {path}: {message}")]
    Load { path: String, message: String },

    #[error("Failed to extract text from page {page} of {path}: {message}")]
    Extraction {
        path: String,
        page: u32,
        message: String,
    },
}

/// Something that turns a document file into an ordered list of page texts.
pub trait PageSource: Send + Sync {
    fn pages(&self, path: &Path) -> Result<Vec<String>, PdfError>;
}

/// [`PageSource`] backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPageSource;

impl PageSource for PdfPageSource {
    fn pages(&self, path: &Path) -> Result<Vec<String>, PdfError> {
        let path_str = path.display().to_string();
        let doc = Document::load(path).map_err(|e| PdfError::Load {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
        let pages = collect_pages(&path_str, page_numbers, |page| {
            doc.extract_text(&[page]).map_err(|e| e.to_string())
        });

        debug!(path = %path_str, pages = pages.len(), "extracted PDF text");
        Ok(pages)
    }
}

/// Extracts each page in order.
///
/// A page that fails to extract is logged and kept as an empty string, so
/// indices still line up with the PDF's pages.
fn collect_pages<F>(path: &str, page_numbers: Vec<u32>, mut extract: F) -> Vec<String>
where
    F: FnMut(u32) -> Result<String, String>,
{
    page_numbers
        .into_iter()
        .map(|page| {
            extract(page).unwrap_or_else(|message| {
                let err = PdfError::Extraction {
                    path: path.to_string(),
                    page,
                    message,
                };
                warn!("{err}");
                String::new()
            })
        })
        .collect()
}

/// Reads all page texts, logging and returning an empty list on failure.
///
/// An unreadable document is a per-question failure, so callers only need
/// to check for emptiness.
pub fn extract_pages(source: &dyn PageSource, path: &Path) -> Vec<String> {
    source.pages(path).unwrap_or_else(|e| {
        error!("Error extracting text from PDF: {e}");
        Vec::new()
    })
}
