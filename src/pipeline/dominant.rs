// DominantStateResolver — stage 2: which state uses each word most.
//
// Ties on the maximum count go to the lexicographically smallest state name,
// so the result never depends on the order records arrived in.

use std::cmp::Ordering;

use crate::records::{DominantState, StateCount};

use super::shuffle::Grouped;

#[derive(Debug, Clone, Copy, Default)]
pub struct DominantStateResolver;

impl DominantStateResolver {
    /// Pick the winning state for one word. `None` only for an empty group.
    pub fn resolve_word(&self, word: &str, values: &[StateCount]) -> Option<DominantState> {
        values
            .iter()
            .max_by(|a, b| rank(a, b))
            .map(|winner| DominantState {
                word: word.to_string(),
                state: winner.state.clone(),
                count: winner.count,
            })
    }

    /// One entry per word that has at least one record, ordered by word.
    pub fn resolve(&self, grouped: &Grouped<String, StateCount>) -> Vec<DominantState> {
        grouped
            .par_reduce(|word, values| self.resolve_word(word, values))
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Higher count wins; on equal counts the smaller state name ranks higher.
fn rank(a: &StateCount, b: &StateCount) -> Ordering {
    a.count
        .cmp(&b.count)
        .then_with(|| b.state.cmp(&a.state))
}
