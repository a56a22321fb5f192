//! Reading inputs and writing the answer sheet.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::models::{AnswerSheet, DocumentMetadata, Question};

/// An input file could not be read or parsed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The answer sheet could not be written.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to serialize answers: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the document metadata array.
pub fn load_metadata(path: &Path) -> Result<Vec<DocumentMetadata>, LoadError> {
    load_json(path)
}

/// Loads the questions array.
pub fn load_questions(path: &Path) -> Result<Vec<Question>, LoadError> {
    load_json(path)
}

/// Loads a previously written answer sheet.
pub fn load_answers(path: &Path) -> Result<AnswerSheet, LoadError> {
    load_json(path)
}

/// Writes the answer sheet as pretty-printed JSON.
pub fn save_answers(sheet: &AnswerSheet, path: &Path) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(sheet).map_err(SaveError::Serialize)?;
    fs::write(path, json).map_err(|source| SaveError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Results saved to {}", path.display());
    Ok(())
}
