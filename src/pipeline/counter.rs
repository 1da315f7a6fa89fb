// Counter — stage 1: per-(state, word) occurrence counts.
//
// Each document is tag-stripped, split on whitespace, and filtered against
// the vocabulary. Matching is exact and case-sensitive: "Sports" and
// "sports," are not "sports". Counts are summed per word inside a document
// (the combiner step), then summed again across documents that share a state.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use rayon::prelude::*;
use regex_lite::Regex;
use tracing::debug;

use crate::corpus::Document;
use crate::errors::{PipelineError, Stage, StageFailure};
use crate::records::{OccurrenceRecord, State};
use crate::vocabulary::Vocabulary;

/// Anything that looks like `<...>` on a single line.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("tag pattern is a valid regex"));

/// Remove every angle-bracket tag from `text`.
pub fn strip_tags(text: &str) -> std::borrow::Cow<'_, str> {
    TAG.replace_all(text, "")
}

/// Stage 1 of the pipeline. Holds the injected vocabulary.
#[derive(Debug, Clone)]
pub struct Counter {
    vocabulary: Vocabulary,
}

impl Counter {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Count vocabulary words in a single text, keyed by word.
    ///
    /// Words that never appear are absent, not zero.
    pub fn count_text(&self, text: &str) -> HashMap<&str, u64> {
        let stripped = strip_tags(text);
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for token in stripped.split_whitespace() {
            if let Some(word) = self.vocabulary.get(token) {
                *counts.entry(word).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Count one document, pre-aggregated per word, ordered by word.
    pub fn count_document(&self, document: &Document) -> Vec<OccurrenceRecord> {
        let mut records: Vec<OccurrenceRecord> = self
            .count_text(&document.text)
            .into_iter()
            .map(|(word, count)| OccurrenceRecord {
                state: document.state.clone(),
                word: word.to_string(),
                count,
            })
            .collect();
        records.sort_by(|a, b| a.word.cmp(&b.word));
        records
    }

    /// Count a whole corpus: one parallel task per document, then a final
    /// per-key sum so documents that share a state merge into one record.
    ///
    /// Output is ordered by (state, word) and holds exactly one record per key.
    /// A document whose state can't be written to an artifact fails the stage.
    pub fn count(&self, documents: &[Document]) -> Result<Vec<OccurrenceRecord>, PipelineError> {
        for doc in documents {
            doc.state
                .validate()
                .map_err(|e| PipelineError::new(Stage::Counter, e))?;
        }

        let per_document: Vec<Vec<OccurrenceRecord>> = documents
            .par_iter()
            .map(|doc| self.count_document(doc))
            .collect();

        let mut totals: BTreeMap<(State, String), u64> = BTreeMap::new();
        for record in per_document.into_iter().flatten() {
            let total = totals
                .entry((record.state.clone(), record.word.clone()))
                .or_insert(0);
            *total = total.checked_add(record.count).ok_or_else(|| {
                PipelineError::new(
                    Stage::Counter,
                    StageFailure::CountOverflow {
                        state: record.state.to_string(),
                        word: record.word.clone(),
                    },
                )
            })?;
        }

        debug!(
            documents = documents.len(),
            keys = totals.len(),
            "Counted vocabulary occurrences"
        );

        Ok(totals
            .into_iter()
            .map(|((state, word), count)| OccurrenceRecord { state, word, count })
            .collect())
    }
}
