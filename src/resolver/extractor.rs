//! Company-name extraction strategies.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, error};

use crate::llm::{ChatRequest, LlmClientTrait};

/// Rules tried in order; the first capture group is the company name.
const NAME_PATTERNS: [&str; 5] = [
    r"For\s+([^,\.]+?),",
    r"Did\s+([^,\.]+?)\s+announce",
    r"by\s+([^,\.]+?)\s+according",
    r"at\s+([^,\.]+?)\s+in",
    r"What\s+is\s+the\s+([^,\.]+?)'s",
];

const EXTRACT_SYSTEM_PROMPT: &str = "Extract only the company name from the following question. Return just the company name, nothing else.";

/// A strategy for pulling a company name out of a question.
pub trait NameExtractor: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Returns the company name, or `None` to let the next extractor try.
    fn extract(&self, question: &str) -> Option<String>;
}

/// Deterministic regex rules matching common question phrasings.
pub struct PatternExtractor {
    patterns: Vec<Regex>,
}

impl PatternExtractor {
    /// Builds the extractor with the standard phrasing rules.
    pub fn new() -> Self {
        let patterns = NAME_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { patterns }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl NameExtractor for PatternExtractor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn extract(&self, question: &str) -> Option<String> {
        self.patterns.iter().find_map(|re| {
            re.captures(question)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
    }
}

/// Asks the model for the company name.
///
/// A failed request or an empty reply yields `None`; the caller treats that
/// as unresolved and does not retry.
pub struct LlmNameExtractor {
    client: Arc<dyn LlmClientTrait>,
}

impl LlmNameExtractor {
    pub fn new(client: Arc<dyn LlmClientTrait>) -> Self {
        Self { client }
    }
}

impl NameExtractor for LlmNameExtractor {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn extract(&self, question: &str) -> Option<String> {
        let request = ChatRequest {
            system: EXTRACT_SYSTEM_PROMPT,
            prompt: question,
            max_tokens: 50,
        };
        match self.client.complete(&request) {
            Ok(reply) => {
                let name = reply.trim();
                (!name.is_empty()).then(|| name.to_string())
            }
            Err(e) => {
                error!("Error extracting company name with LLM: {e}");
                None
            }
        }
    }
}

/// Ordered chain of extractors; the first one to produce a name wins.
pub struct ExtractorChain {
    extractors: Vec<Box<dyn NameExtractor>>,
}

impl ExtractorChain {
    pub fn new(extractors: Vec<Box<dyn NameExtractor>>) -> Self {
        Self { extractors }
    }

    /// Pattern rules first, then the model as a fallback.
    pub fn standard(client: Arc<dyn LlmClientTrait>) -> Self {
        Self::new(vec![
            Box::new(PatternExtractor::new()),
            Box::new(LlmNameExtractor::new(client)),
        ])
    }

    pub fn extract(&self, question: &str) -> Option<String> {
        self.extractors.iter().find_map(|extractor| {
            let name = extractor.extract(question)?;
            debug!(extractor = extractor.name(), company = %name, "extracted company name");
            Some(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl CountingClient {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("boom".to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl LlmClientTrait for CountingClient {
        fn complete(&self, _request: &ChatRequest<'_>) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(|message| LlmError::Api { message })
        }
    }

    #[test]
    fn pattern_for_company_comma() {
        let extractor = PatternExtractor::new();
        assert_eq!(
            extractor.extract("For Acme Corp, what was the total revenue?"),
            Some("Acme Corp".to_string())
        );
    }

    #[test]
    fn pattern_did_company_announce() {
        let extractor = PatternExtractor::new();
        assert_eq!(
            extractor.extract("Did Liberty Broadband Corporation announce a share buyback plan?"),
            Some("Liberty Broadband Corporation".to_string())
        );
    }

    #[test]
    fn pattern_by_company_according() {
        let extractor = PatternExtractor::new();
        assert_eq!(
            extractor.extract("How many stores were opened by Zeta Retail according to the report?"),
            Some("Zeta Retail".to_string())
        );
    }

    #[test]
    fn pattern_at_company_in() {
        let extractor = PatternExtractor::new();
        assert_eq!(
            extractor.extract("Who was the CFO at Omega Holdings in 2022?"),
            Some("Omega Holdings".to_string())
        );
    }

    #[test]
    fn pattern_possessive_company() {
        let extractor = PatternExtractor::new();
        assert_eq!(
            extractor.extract("What is the Beta Labs's dividend yield?"),
            Some("Beta Labs".to_string())
        );
    }

    #[test]
    fn earlier_rule_wins_when_several_match() {
        let extractor = PatternExtractor::new();
        // Both "For ..., " and "at ... in" match; the "For" rule is first.
        assert_eq!(
            extractor.extract("For Gamma Inc, who was the CEO at Gamma Inc in 2021?"),
            Some("Gamma Inc".to_string())
        );
    }

    #[test]
    fn patterns_are_case_sensitive() {
        let extractor = PatternExtractor::new();
        assert_eq!(extractor.extract("did acme announce anything?"), None);
    }

    #[test]
    fn chain_skips_llm_when_pattern_matches() {
        let client = CountingClient::replying("Wrong Co");
        let chain = ExtractorChain::standard(client.clone());

        let name = chain.extract("For Acme Corp, what was the revenue?");
        assert_eq!(name.as_deref(), Some("Acme Corp"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn chain_falls_back_to_llm() {
        let client = CountingClient::replying("  Acme Corp\n");
        let chain = ExtractorChain::standard(client.clone());

        let name = chain.extract("How much cash does Acme Corp hold?");
        assert_eq!(name.as_deref(), Some("Acme Corp"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn llm_failure_yields_none() {
        let client = CountingClient::failing();
        let chain = ExtractorChain::standard(client.clone());

        assert_eq!(chain.extract("How much cash does Acme Corp hold?"), None);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_llm_reply_yields_none() {
        let extractor = LlmNameExtractor::new(CountingClient::replying("   "));
        assert_eq!(extractor.extract("Who knows?"), None);
    }
}
