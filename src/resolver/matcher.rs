//! Exact and word-overlap matching of company names against the index.

use std::collections::HashSet;

use crate::index::MetadataIndex;
use crate::models::DocumentId;

/// A fuzzy candidate and its word-overlap score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub name: &'a str,
    pub id: &'a DocumentId,
    pub score: usize,
}

/// Number of distinct lowercase whitespace-separated words shared by `a` and `b`.
pub fn word_overlap(a: &str, b: &str) -> usize {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    left.intersection(&right).count()
}

/// Maps a company name to a document id.
///
/// Tries a case-insensitive exact lookup first, then picks the indexed name
/// sharing the most words with `name`. Ties go to the name that appears first
/// in the metadata file. Returns `None` when no indexed name shares a word.
pub fn resolve_document(name: &str, index: &MetadataIndex) -> Option<DocumentId> {
    if let Some(id) = index.id_for_name(name) {
        return Some(id.clone());
    }

    let mut best: Option<&DocumentId> = None;
    let mut best_score = 0;
    for (candidate, id) in index.names() {
        let score = word_overlap(name, candidate);
        if score > best_score {
            best_score = score;
            best = Some(id);
        }
    }
    best.cloned()
}

/// Lists up to `limit` fuzzy candidates, best first.
///
/// Candidates with no shared words are dropped. Equal scores are ordered by
/// lowercase name, descending.
pub fn rank_matches<'a>(
    name: &str,
    index: &'a MetadataIndex,
    limit: usize,
) -> Vec<FuzzyMatch<'a>> {
    let mut matches: Vec<FuzzyMatch<'a>> = index
        .names()
        .map(|(candidate, id)| FuzzyMatch {
            name: candidate,
            id,
            score: word_overlap(name, candidate),
        })
        .filter(|m| m.score > 0)
        .collect();
    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| b.name.cmp(a.name)));
    matches.truncate(limit);
    matches
}
