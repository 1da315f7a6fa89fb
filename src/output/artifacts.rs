// Artifact files — the four pipeline outputs plus a JSON run summary.
//
// Each artifact is one codec line per record, so any stage can be rerun
// later from the previous stage's file.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pipeline::{PipelineOutput, ZeroCountPolicy};
use crate::records::codec::encode_lines;
use crate::vocabulary::Vocabulary;

/// Per-(state, word) counts: `{state}:{word}\t{count}`
pub const COUNTS_FILE: &str = "statewise.tsv";
/// Per-word dominant state: `{word}\t{state}`
pub const DOMINANT_FILE: &str = "dominant.tsv";
/// Per-state ranking signature: `{signature}\t{state}`
pub const SIGNATURES_FILE: &str = "rankings.tsv";
/// Per-signature states: `{signature}\t{state},{state}`
pub const GROUPS_FILE: &str = "groups.tsv";
/// Machine-readable summary of the whole run.
pub const SUMMARY_FILE: &str = "summary.json";

/// Everything about one run, for `summary.json` and the Markdown report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    /// Where the documents came from
    pub corpus: String,
    pub vocabulary: Vocabulary,
    pub zero_counts: ZeroCountPolicy,
    pub documents: usize,
    pub output: PipelineOutput,
}

impl RunSummary {
    pub fn new(
        corpus: impl Into<String>,
        vocabulary: Vocabulary,
        zero_counts: ZeroCountPolicy,
        documents: usize,
        output: PipelineOutput,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            corpus: corpus.into(),
            vocabulary,
            zero_counts,
            documents,
            output,
        }
    }

    /// Number of distinct states that mentioned at least one vocabulary word.
    pub fn state_count(&self) -> usize {
        self.output.signatures.len()
    }
}

/// Write records one per line to `dir/name`, creating `dir` if needed.
pub fn write_records<'a, T>(
    dir: &Path,
    name: &str,
    records: impl IntoIterator<Item = &'a T>,
) -> Result<PathBuf>
where
    T: Display + 'a,
{
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, encode_lines(records))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write all four artifacts and the JSON summary. Returns the paths written.
pub fn write_all(dir: &Path, summary: &RunSummary) -> Result<Vec<PathBuf>> {
    let output = &summary.output;
    let mut written = vec![
        write_records(dir, COUNTS_FILE, &output.counts)?,
        write_records(dir, DOMINANT_FILE, &output.dominant)?,
        write_records(dir, SIGNATURES_FILE, &output.signatures)?,
        write_records(dir, GROUPS_FILE, &output.groups)?,
    ];

    let summary_path = dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
    written.push(summary_path);

    info!(dir = %dir.display(), files = written.len(), "Wrote artifacts");
    Ok(written)
}

/// Read an artifact written by an earlier run (or an earlier stage).
pub fn read_artifact(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact {}", path.display()))
}

/// Load a `summary.json` written by `write_all`.
pub fn read_summary(path: &Path) -> Result<RunSummary> {
    let json = read_artifact(path)?;
    serde_json::from_str(&json).with_context(|| format!("Malformed summary {}", path.display()))
}
