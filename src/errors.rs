// Typed errors for the library side of the pipeline.
//
// The binary wraps these in anyhow at the boundary. Inside the library we keep
// them typed so callers (and tests) can tell a malformed record apart from a
// bad vocabulary or a failed stage.

use std::fmt;

use thiserror::Error;

/// The four aggregation stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Counter,
    DominantState,
    SignatureBuilder,
    SignatureGrouper,
}

impl Stage {
    /// Short machine-friendly name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Counter => "counter",
            Stage::DominantState => "dominant-state",
            Stage::SignatureBuilder => "signature-builder",
            Stage::SignatureGrouper => "signature-grouper",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single intermediate or artifact line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("field '{field}' is missing the ':' delimiter")]
    MissingDelimiter { field: String },
    #[error("empty {what} in record")]
    EmptyField { what: &'static str },
    #[error("invalid count '{value}'")]
    InvalidCount { value: String },
    #[error("{state}:{word} appears more than once")]
    DuplicateKey { state: String, word: String },
    #[error(transparent)]
    InvalidState(#[from] StateError),
    #[error("line {line}: {source} (in {text:?})")]
    AtLine {
        line: usize,
        text: String,
        #[source]
        source: Box<RecordError>,
    },
}

/// Problems with a configured vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("vocabulary is empty")]
    Empty,
    #[error("vocabulary contains an empty word")]
    EmptyWord,
    #[error("vocabulary word {0:?} appears more than once")]
    Duplicate(String),
    #[error("vocabulary word {word:?} contains reserved character {ch:?}")]
    ReservedCharacter { word: String, ch: char },
}

/// A state name that can't be written to an artifact and read back intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state name is empty")]
    Empty,
    #[error("state name {name:?} contains reserved character {ch:?}")]
    ReservedCharacter { name: String, ch: char },
}

/// Why a stage failed.
#[derive(Debug, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    InvalidState(#[from] StateError),
    #[error("count for {state}:{word} overflowed")]
    CountOverflow { state: String, word: String },
}

/// A failed pipeline stage. The remaining stages never run.
#[derive(Debug, Error)]
#[error("stage '{stage}' failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageFailure,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageFailure>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_names_the_stage() {
        let err = PipelineError::new(
            Stage::SignatureGrouper,
            RecordError::FieldCount {
                expected: 2,
                found: 1,
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("signature-grouper"), "got: {msg}");
        assert!(msg.contains("expected 2"), "got: {msg}");
    }

    #[test]
    fn line_error_includes_position_and_text() {
        let err = RecordError::AtLine {
            line: 3,
            text: "broken".to_string(),
            source: Box::new(RecordError::FieldCount {
                expected: 2,
                found: 1,
            }),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("line 3:"), "got: {msg}");
        assert!(msg.contains("\"broken\""), "got: {msg}");
    }
}
