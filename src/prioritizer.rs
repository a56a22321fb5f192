//! Keyword-based selection of pages to read first.

/// A topic the question may be about, with the page keywords that signal it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCluster {
    Financial,
    Leadership,
    Risk,
}

impl KeywordCluster {
    /// Clusters in the order pages are tested against them.
    pub const ALL: [KeywordCluster; 3] = [
        KeywordCluster::Financial,
        KeywordCluster::Leadership,
        KeywordCluster::Risk,
    ];

    /// Lowercase phrases that mark a page as covering this topic.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Financial => &[
                "financial statements",
                "balance sheet",
                "income statement",
                "cash flow",
                "financial results",
            ],
            Self::Leadership => &[
                "board of directors",
                "executive officers",
                "management",
                "leadership",
            ],
            Self::Risk => &["risk factors", "risks", "uncertainties"],
        }
    }

    /// Word the question must contain for this cluster to apply.
    pub fn cue(self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Leadership => "leadership",
            Self::Risk => "risk",
        }
    }

    fn matches_page(self, page_lower: &str) -> bool {
        self.keywords().iter().any(|k| page_lower.contains(k))
    }
}

/// Returns indices of pages worth reading first, in page order.
///
/// A page is listed once for every cluster whose cue appears in the question
/// and whose keywords appear on the page, so a page matching two active
/// clusters is listed twice.
pub fn prioritize_pages<S: AsRef<str>>(question: &str, pages: &[S]) -> Vec<usize> {
    let question_lower = question.to_lowercase();
    let active: Vec<KeywordCluster> = KeywordCluster::ALL
        .into_iter()
        .filter(|c| question_lower.contains(c.cue()))
        .collect();
    if active.is_empty() {
        return Vec::new();
    }

    let mut priority = Vec::new();
    for (i, page) in pages.iter().enumerate() {
        let page_lower = page.as_ref().to_lowercase();
        for cluster in &active {
            if cluster.matches_page(&page_lower) {
                priority.push(i);
            }
        }
    }
    priority
}
