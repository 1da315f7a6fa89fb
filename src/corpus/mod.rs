// Corpus ingestion — where documents come from.
//
// The pipeline itself only sees `Document`s with an explicit state attached.
// How a state is derived (file name, database row, test fixture) belongs to
// the source that produced the document.

pub mod directory;
pub mod traits;

use serde::{Deserialize, Serialize};

use crate::records::State;

pub use directory::DirectorySource;
pub use traits::{CorpusSource, MemorySource};

/// One state's text. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub state: State,
    pub text: String,
}

impl Document {
    pub fn new(state: impl Into<State>, text: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            text: text.into(),
        }
    }

    /// Pair text with the state derived from a document name
    /// (the part after the final `/`).
    pub fn from_named(name: &str, text: impl Into<String>) -> Self {
        Self {
            state: State::from_document_name(name),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_document_derives_state() {
        let doc = Document::from_named("input/states/Vermont", "sports");
        assert_eq!(doc.state.as_str(), "Vermont");
        assert_eq!(doc.text, "sports");
    }
}
