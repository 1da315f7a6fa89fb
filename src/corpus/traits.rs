// Corpus source trait — swap-ready abstraction over where documents live.
//
// The CLI reads a directory of per-state files. Tests and embedders hand over
// documents they already have in memory.

use anyhow::Result;
use async_trait::async_trait;

use super::Document;

/// Something that can produce the full set of documents for one run.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Human-readable description for logs ("directory ./states").
    fn describe(&self) -> String;

    /// Load every document. An empty corpus is not an error.
    async fn load(&self) -> Result<Vec<Document>>;
}

/// Documents supplied directly by the caller.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<Document>,
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build from (name, text) pairs, deriving each state from its name.
    pub fn from_named<N, T>(pairs: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: AsRef<str>,
        T: Into<String>,
    {
        Self {
            documents: pairs
                .into_iter()
                .map(|(name, text)| Document::from_named(name.as_ref(), text))
                .collect(),
        }
    }
}

#[async_trait]
impl CorpusSource for MemorySource {
    fn describe(&self) -> String {
        format!("{} in-memory documents", self.documents.len())
    }

    async fn load(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}
