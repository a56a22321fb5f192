//! Batched evidence queries and answer reconciliation.

use tracing::debug;

use crate::models::{AnswerKind, UNRESOLVED};

use super::oracle::AnswerOracle;

/// Pages sent to the model per batch query.
pub const BATCH_SIZE: usize = 5;

/// Best answer found for a question.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub value: String,
    /// Page whose single-page answer reproduced `value`, if any did.
    pub page_index: Option<usize>,
    pub confidence: f64,
}

impl Selection {
    fn unresolved() -> Self {
        Self {
            value: UNRESOLVED.to_string(),
            page_index: None,
            confidence: 0.0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.value != UNRESOLVED
    }
}

/// Builds the "Page N: <text>" context for a batch.
///
/// Indices outside `pages` are skipped.
pub fn batch_context<S: AsRef<str>>(pages: &[S], batch: &[usize]) -> String {
    batch
        .iter()
        .filter_map(|&idx| pages.get(idx).map(|text| format!("Page {}: {}", idx, text.as_ref())))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Picks the highest-confidence answer across page batches.
///
/// Priority pages are read first in batches of [`BATCH_SIZE`]. Only when
/// they yield nothing does the selector walk the whole document in
/// fixed windows, skipping any window that holds a priority page. Whenever a
/// batch produces a new best answer, each of its pages is asked on its own
/// and the first page giving the identical answer becomes the citation.
pub struct AnswerSelector<'a> {
    oracle: &'a dyn AnswerOracle,
}

impl<'a> AnswerSelector<'a> {
    pub fn new(oracle: &'a dyn AnswerOracle) -> Self {
        Self { oracle }
    }

    pub fn select<S: AsRef<str>>(
        &self,
        question: &str,
        kind: &AnswerKind,
        pages: &[S],
        priority: &[usize],
    ) -> Selection {
        let priority: Vec<usize> = priority
            .iter()
            .copied()
            .filter(|&idx| idx < pages.len())
            .collect();
        let mut best = Selection::unresolved();

        for batch in priority.chunks(BATCH_SIZE) {
            self.consider(question, kind, pages, batch, &mut best);
        }

        if !best.is_resolved() {
            for start in (0..pages.len()).step_by(BATCH_SIZE) {
                let end = start + BATCH_SIZE;
                if priority.iter().any(|&p| start <= p && p < end) {
                    continue;
                }
                let batch: Vec<usize> = (start..end.min(pages.len())).collect();
                self.consider(question, kind, pages, &batch, &mut best);
            }
        }

        best
    }

    fn consider<S: AsRef<str>>(
        &self,
        question: &str,
        kind: &AnswerKind,
        pages: &[S],
        batch: &[usize],
        best: &mut Selection,
    ) {
        let context = batch_context(pages, batch);
        let answer = self.oracle.ask(question, &context, kind);

        if answer.confidence > best.confidence && !answer.is_unresolved() {
            let page_index = self.localize(question, kind, pages, batch, &answer.text);
            debug!(
                batch = ?batch,
                answer = %answer.text,
                page = ?page_index,
                "new best answer"
            );
            *best = Selection {
                value: answer.text,
                page_index,
                confidence: answer.confidence,
            };
        }
    }

    fn localize<S: AsRef<str>>(
        &self,
        question: &str,
        kind: &AnswerKind,
        pages: &[S],
        batch: &[usize],
        answer: &str,
    ) -> Option<usize> {
        batch.iter().copied().find(|&idx| {
            pages
                .get(idx)
                .is_some_and(|text| self.oracle.ask(question, text.as_ref(), kind).text == answer)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answerer::OracleAnswer;
    use std::cell::RefCell;

    /// Oracle that answers from a script keyed on the context it receives.
    struct ScriptedOracle<F: Fn(&str) -> OracleAnswer> {
        respond: F,
        contexts: RefCell<Vec<String>>,
    }

    impl<F: Fn(&str) -> OracleAnswer> ScriptedOracle<F> {
        fn new(respond: F) -> Self {
            Self {
                respond,
                contexts: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.contexts.borrow().len()
        }
    }

    impl<F: Fn(&str) -> OracleAnswer> AnswerOracle for ScriptedOracle<F> {
        fn ask(&self, _question: &str, context: &str, _kind: &AnswerKind) -> OracleAnswer {
            self.contexts.borrow_mut().push(context.to_string());
            (self.respond)(context)
        }
    }

    fn answer(text: &str, confidence: f64) -> OracleAnswer {
        OracleAnswer {
            text: text.to_string(),
            confidence,
        }
    }

    fn pages(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text of page {i}")).collect()
    }

    #[test]
    fn batch_context_labels_pages() {
        let pages = pages(3);
        assert_eq!(
            batch_context(&pages, &[0, 2]),
            "Page 0: text of page 0\n\nPage 2: text of page 2"
        );
        assert_eq!(batch_context(&pages, &[7]), "");
    }

    #[test]
    fn everything_na_stays_unresolved() {
        let oracle = ScriptedOracle::new(|_| answer("N/A", 0.9));
        let pages = pages(12);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Number, &pages, &[]);

        assert!(!selection.is_resolved());
        assert_eq!(selection.page_index, None);
        // 12 pages → 3 batches, no localization calls.
        assert_eq!(oracle.calls(), 3);
    }

    #[test]
    fn answer_found_in_remaining_pass_is_localized() {
        let oracle = ScriptedOracle::new(|ctx| {
            if ctx.contains("text of page 7") {
                answer("42", 0.9)
            } else {
                answer("N/A", 0.9)
            }
        });
        let pages = pages(10);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Number, &pages, &[]);

        assert_eq!(selection.value, "42");
        assert_eq!(selection.page_index, Some(7));
    }

    #[test]
    fn priority_answer_skips_remaining_pass() {
        let oracle = ScriptedOracle::new(|ctx| {
            if ctx.contains("text of page 11") {
                answer("yes", 0.9)
            } else {
                answer("N/A", 0.9)
            }
        });
        let pages = pages(20);
        let selection =
            AnswerSelector::new(&oracle).select("q", &AnswerKind::Boolean, &pages, &[3, 11]);

        assert_eq!(selection.value, "yes");
        assert_eq!(selection.page_index, Some(11));
        // One priority batch, then pages 3 and 11 asked individually.
        assert_eq!(oracle.calls(), 3);
    }

    #[test]
    fn remaining_pass_skips_windows_holding_priority_pages() {
        let oracle = ScriptedOracle::new(|_| answer("N/A", 0.9));
        let pages = pages(15);
        AnswerSelector::new(&oracle).select("q", &AnswerKind::Number, &pages, &[6]);

        let contexts = oracle.contexts.borrow();
        // Priority batch [6], then windows 0..5 and 10..15; 5..10 is skipped.
        assert_eq!(contexts.len(), 3);
        assert_eq!(contexts[0], "Page 6: text of page 6");
        assert!(contexts[1].starts_with("Page 0:"));
        assert!(contexts[2].starts_with("Page 10:"));
        assert!(!contexts.iter().skip(1).any(|c| c.contains("Page 5:")));
    }

    #[test]
    fn priority_batches_follow_list_position_not_adjacency() {
        let oracle = ScriptedOracle::new(|_| answer("N/A", 0.9));
        let pages = pages(40);
        let priority = [1, 9, 17, 25, 33, 39];
        AnswerSelector::new(&oracle).select("q", &AnswerKind::Number, &pages, &priority);

        let contexts = oracle.contexts.borrow();
        assert_eq!(
            contexts[0],
            batch_context(&pages, &[1, 9, 17, 25, 33])
        );
        assert_eq!(contexts[1], batch_context(&pages, &[39]));
    }

    #[test]
    fn duplicate_priority_pages_are_tolerated() {
        let oracle = ScriptedOracle::new(|ctx| {
            if ctx.contains("text of page 2") {
                answer("Jane Doe", 0.9)
            } else {
                answer("N/A", 0.9)
            }
        });
        let pages = pages(4);
        let selection =
            AnswerSelector::new(&oracle).select("q", &AnswerKind::Name, &pages, &[2, 2]);

        assert_eq!(selection.value, "Jane Doe");
        assert_eq!(selection.page_index, Some(2));
    }

    #[test]
    fn unlocalized_answer_has_no_page() {
        // Batch answers "10", but no single page reproduces it.
        let oracle = ScriptedOracle::new(|ctx| {
            if ctx.contains("\n\n") {
                answer("10", 0.9)
            } else {
                answer("5", 0.9)
            }
        });
        let pages = pages(3);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Number, &pages, &[]);

        assert_eq!(selection.value, "10");
        assert_eq!(selection.page_index, None);
    }

    #[test]
    fn first_matching_page_wins_localization() {
        let oracle = ScriptedOracle::new(|_| answer("same", 0.9));
        let pages = pages(5);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Name, &pages, &[]);

        assert_eq!(selection.page_index, Some(0));
        // Batch call plus one localization call that matched immediately.
        assert_eq!(oracle.calls(), 2);
    }

    #[test]
    fn higher_confidence_batch_replaces_best() {
        let oracle = ScriptedOracle::new(|ctx| {
            if ctx.contains("text of page 0") {
                answer("low", 0.3)
            } else if ctx.contains("text of page 5") {
                answer("high", 0.8)
            } else {
                answer("N/A", 0.0)
            }
        });
        let pages = pages(10);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Name, &pages, &[]);

        assert_eq!(selection.value, "high");
        assert_eq!(selection.page_index, Some(5));
        assert_eq!(selection.confidence, 0.8);
    }

    #[test]
    fn failed_calls_never_displace_best() {
        let oracle = ScriptedOracle::new(|ctx| {
            if ctx.contains("text of page 1") {
                answer("found", 0.9)
            } else {
                answer("N/A", 0.0)
            }
        });
        let pages = pages(15);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Name, &pages, &[]);

        assert_eq!(selection.value, "found");
        assert_eq!(selection.page_index, Some(1));
    }

    #[test]
    fn best_confidence_never_exceeds_any_single_call() {
        let confidences = [0.2, 0.7, 0.4, 0.65];
        let oracle = ScriptedOracle::new(|ctx| {
            let page: usize = ctx
                .trim_start_matches("Page ")
                .split(':')
                .next()
                .and_then(|n| n.parse().ok())
                .unwrap_or(0);
            answer("x", confidences[(page / BATCH_SIZE) % confidences.len()])
        });
        let pages = pages(20);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Name, &pages, &[]);

        let max = confidences.iter().cloned().fold(0.0, f64::max);
        assert!(selection.confidence <= max);
        assert_eq!(selection.confidence, 0.7);
    }

    #[test]
    fn out_of_range_priority_indices_are_ignored() {
        let oracle = ScriptedOracle::new(|_| answer("v", 0.9));
        let pages = pages(2);
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Name, &pages, &[9]);

        assert_eq!(selection.page_index, Some(0));
    }

    #[test]
    fn empty_document_makes_no_calls() {
        let oracle = ScriptedOracle::new(|_| answer("v", 0.9));
        let pages: Vec<String> = Vec::new();
        let selection = AnswerSelector::new(&oracle).select("q", &AnswerKind::Name, &pages, &[]);

        assert!(!selection.is_resolved());
        assert_eq!(oracle.calls(), 0);
    }
}
