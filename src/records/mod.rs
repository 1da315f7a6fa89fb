// Record types — the values that flow between pipeline stages.
//
// These are plain data. The line formats used when records are written to or
// read from artifacts live in `codec`.

pub mod codec;

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::StateError;

/// Separator between words in a canonical ranking signature.
pub const SIGNATURE_DELIMITER: char = '>';

/// A state identifier, e.g. "Ohio".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive a state from a document name: everything after the final `/`.
    ///
    /// "corpus/states/Ohio" -> "Ohio". A name without a `/` is used whole.
    pub fn from_document_name(name: &str) -> Self {
        let state = match name.rfind('/') {
            Some(i) => &name[i + 1..],
            None => name,
        };
        Self(state.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the name survives a trip through the artifact formats:
    /// non-empty, no `,` (the group separator) and no control characters
    /// (tabs and line breaks delimit fields and records).
    pub fn validate(&self) -> Result<(), StateError> {
        if self.0.is_empty() {
            return Err(StateError::Empty);
        }
        match self.0.chars().find(|&c| c == ',' || c.is_control()) {
            Some(ch) => Err(StateError::ReservedCharacter {
                name: self.0.clone(),
                ch,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for State {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// How many times one vocabulary word occurs in one state's text.
///
/// After the Counter stage there is exactly one record per (state, word).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub state: State,
    pub word: String,
    pub count: u64,
}

impl OccurrenceRecord {
    pub fn new(state: impl Into<State>, word: impl Into<String>, count: u64) -> Self {
        Self {
            state: state.into(),
            word: word.into(),
            count,
        }
    }
}

/// A (state, count) value grouped under a word key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCount {
    pub state: State,
    pub count: u64,
}

/// A (word, count) value grouped under a state key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// An occurrence re-keyed by word, on its way into the dominant-state stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordKeyed {
    pub word: String,
    pub value: StateCount,
}

/// An occurrence re-keyed by state, on its way into the signature builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKeyed {
    pub state: State,
    pub value: WordCount,
}

impl From<OccurrenceRecord> for WordKeyed {
    fn from(r: OccurrenceRecord) -> Self {
        Self {
            word: r.word,
            value: StateCount {
                state: r.state,
                count: r.count,
            },
        }
    }
}

impl From<OccurrenceRecord> for StateKeyed {
    fn from(r: OccurrenceRecord) -> Self {
        Self {
            state: r.state,
            value: WordCount {
                word: r.word,
                count: r.count,
            },
        }
    }
}

/// The state that uses a word most.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantState {
    pub word: String,
    pub state: State,
    /// The winning count, kept for reporting. Not part of the artifact line.
    pub count: u64,
}

/// Vocabulary words ordered by descending count within one state,
/// joined with `>`: "sports>education>politics".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingSignature(String);

impl RankingSignature {
    /// Join already-ordered words into a canonical signature.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for word in words {
            if !joined.is_empty() {
                joined.push(SIGNATURE_DELIMITER);
            }
            joined.push_str(word.as_ref());
        }
        Self(joined)
    }

    /// Wrap a signature string read from an artifact.
    pub fn from_canonical(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    /// The words of the signature, highest count first.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(SIGNATURE_DELIMITER).filter(|w| !w.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RankingSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One state's ranking signature (SignatureBuilder output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSignature {
    pub state: State,
    pub signature: RankingSignature,
}

/// All states sharing one ranking signature, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureGroup {
    pub signature: RankingSignature,
    pub states: Vec<State>,
}

impl SignatureGroup {
    /// States joined with commas, for display.
    pub fn states_joined(&self) -> String {
        self.states
            .iter()
            .map(State::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
