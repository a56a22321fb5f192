use serde::{Deserialize, Serialize};

use super::ids::DocumentId;

/// Topics that annual-report metadata records carry a boolean flag for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicFlag {
    ShareBuyback,
    DividendPolicy,
    MergersAndAcquisitions,
}

impl TopicFlag {
    /// All flags, in the order the shortcut checks them.
    pub const ALL: [TopicFlag; 3] = [
        TopicFlag::ShareBuyback,
        TopicFlag::DividendPolicy,
        TopicFlag::MergersAndAcquisitions,
    ];

    /// Lowercase phrase that marks a question as being about this topic.
    pub fn phrase(self) -> &'static str {
        match self {
            Self::ShareBuyback => "share buyback",
            Self::DividendPolicy => "dividend policy",
            Self::MergersAndAcquisitions => "mergers",
        }
    }
}

/// Metadata record describing one annual report.
///
/// Only the fields the pipeline reads are typed; everything else in the
/// source record is kept in `extra` so it survives a print round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub sha1: DocumentId,
    pub company_name: String,
    #[serde(default)]
    pub major_industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_share_buyback_plans: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_dividend_policy_changes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions_recent_mergers_and_acquisitions: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DocumentMetadata {
    /// Creates a record with no topic flags set.
    pub fn new(
        sha1: impl Into<DocumentId>,
        company_name: impl Into<String>,
        major_industry: impl Into<String>,
    ) -> Self {
        Self {
            sha1: sha1.into(),
            company_name: company_name.into(),
            major_industry: major_industry.into(),
            has_share_buyback_plans: None,
            has_dividend_policy_changes: None,
            mentions_recent_mergers_and_acquisitions: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Returns the flag value for `topic`, `None` when the record omits it.
    pub fn flag(&self, topic: TopicFlag) -> Option<bool> {
        match topic {
            TopicFlag::ShareBuyback => self.has_share_buyback_plans,
            TopicFlag::DividendPolicy => self.has_dividend_policy_changes,
            TopicFlag::MergersAndAcquisitions => self.mentions_recent_mergers_and_acquisitions,
        }
    }

    /// Sets the flag value for `topic`.
    pub fn with_flag(mut self, topic: TopicFlag, value: bool) -> Self {
        match topic {
            TopicFlag::ShareBuyback => self.has_share_buyback_plans = Some(value),
            TopicFlag::DividendPolicy => self.has_dividend_policy_changes = Some(value),
            TopicFlag::MergersAndAcquisitions => {
                self.mentions_recent_mergers_and_acquisitions = Some(value)
            }
        }
        self
    }
}
