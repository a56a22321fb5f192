//! Mapping question text to the document it is about.
//!
//! Resolution happens in two steps: a chain of [`NameExtractor`]s pulls a
//! company name out of the question, then [`resolve_document`] maps that name
//! onto a document id through the [`MetadataIndex`](crate::index::MetadataIndex).

mod extractor;
mod matcher;

pub use extractor::{ExtractorChain, LlmNameExtractor, NameExtractor, PatternExtractor};
pub use matcher::{FuzzyMatch, rank_matches, resolve_document, word_overlap};
