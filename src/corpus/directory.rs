// Directory corpus — one file per state, state taken from the file name.
//
// Files are read concurrently (bounded by `concurrency`) and returned sorted
// by file name so repeated runs see documents in the same order. Hidden
// files, `_`-prefixed markers like `_SUCCESS`, and subdirectories are
// skipped. Symlinks are followed. Bytes that aren't valid UTF-8 are replaced
// rather than rejected.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::traits::CorpusSource;
use super::Document;

/// Reads every regular file in a directory (or a single file) as a document.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    concurrency: usize,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, concurrency: usize) -> Self {
        Self {
            root: root.into(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the files that make up the corpus, sorted by name.
    pub async fn list_files(&self) -> Result<Vec<PathBuf>> {
        let meta = tokio::fs::metadata(&self.root)
            .await
            .with_context(|| format!("Corpus path {} is not readable", self.root.display()))?;

        if meta.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("Failed to list corpus directory {}", self.root.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(['.', '_']) {
                continue;
            }
            let path = entry.path();
            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if is_file {
                files.push(path);
            } else {
                debug!(path = %path.display(), "Skipping non-file corpus entry");
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl CorpusSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    async fn load(&self) -> Result<Vec<Document>> {
        let files = self.list_files().await?;
        if files.is_empty() {
            info!(root = %self.root.display(), "Corpus is empty");
            return Ok(Vec::new());
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Reading [{bar:30}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let results: Vec<Result<(PathBuf, Document)>> =
            stream::iter(files.into_iter().map(|path| {
                let pb = pb.clone();
                async move {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    pb.inc(1);
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    let doc = Document::from_named(&path.to_string_lossy(), text);
                    doc.state.validate().with_context(|| {
                        format!("File name {} is not a usable state name", path.display())
                    })?;
                    Ok((path, doc))
                }
            }))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        pb.finish_and_clear();

        let mut loaded = results.into_iter().collect::<Result<Vec<_>>>()?;
        loaded.sort_by(|a, b| a.0.cmp(&b.0));

        info!(
            root = %self.root.display(),
            documents = loaded.len(),
            "Loaded corpus"
        );

        Ok(loaded.into_iter().map(|(_, doc)| doc).collect())
    }
}
