//! In-memory lookup tables over document metadata.

use std::collections::HashMap;

use crate::models::{DocumentId, DocumentMetadata};

/// Name and id lookups over a metadata collection.
///
/// Company names are keyed in lowercase. The order in which names were first
/// seen is kept so fuzzy matching can break ties deterministically.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    names: Vec<(String, DocumentId)>,
    name_positions: HashMap<String, usize>,
    by_id: HashMap<DocumentId, DocumentMetadata>,
}

impl MetadataIndex {
    /// Builds both lookups in a single pass.
    ///
    /// A repeated name keeps its first position but points at the last
    /// record's id; a repeated id keeps the last record.
    pub fn build(records: impl IntoIterator<Item = DocumentMetadata>) -> Self {
        let mut index = Self::default();
        for record in records {
            let key = record.company_name.to_lowercase();
            match index.name_positions.get(&key) {
                Some(&pos) => index.names[pos].1 = record.sha1.clone(),
                None => {
                    index.name_positions.insert(key.clone(), index.names.len());
                    index.names.push((key, record.sha1.clone()));
                }
            }
            index.by_id.insert(record.sha1.clone(), record);
        }
        index
    }

    /// Case-insensitive whole-name lookup.
    pub fn id_for_name(&self, name: &str) -> Option<&DocumentId> {
        self.name_positions
            .get(&name.to_lowercase())
            .map(|&pos| &self.names[pos].1)
    }

    pub fn metadata(&self, id: &DocumentId) -> Option<&DocumentMetadata> {
        self.by_id.get(id)
    }

    /// Lowercased names with their ids, in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &DocumentId)> {
        self.names.iter().map(|(name, id)| (name.as_str(), id))
    }

    /// Number of distinct documents.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
