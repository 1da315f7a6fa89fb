use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::pipeline::ZeroCountPolicy;
use crate::vocabulary::Vocabulary;

/// Default number of corpus files read at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Words to look for (STATESTATS_VOCABULARY, comma-separated)
    pub vocabulary: Vocabulary,
    /// Where artifacts are written (STATESTATS_OUTPUT_DIR, default ./output)
    pub output_dir: PathBuf,
    /// Whether unseen words appear in signatures (STATESTATS_ZERO_COUNTS)
    pub zero_counts: ZeroCountPolicy,
    /// Concurrent file reads during ingestion (STATESTATS_CONCURRENCY)
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            output_dir: PathBuf::from("./output"),
            zero_counts: ZeroCountPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset or empty values fall back to defaults; values that are set but
    /// invalid are errors, never silently ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let vocabulary = match get("STATESTATS_VOCABULARY") {
            Some(raw) => raw
                .parse::<Vocabulary>()
                .with_context(|| format!("Invalid STATESTATS_VOCABULARY: {raw:?}"))?,
            None => defaults.vocabulary,
        };

        let zero_counts = match get("STATESTATS_ZERO_COUNTS") {
            Some(raw) => raw
                .parse::<ZeroCountPolicy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid STATESTATS_ZERO_COUNTS")?,
            None => defaults.zero_counts,
        };

        let concurrency = match get("STATESTATS_CONCURRENCY") {
            Some(raw) => {
                let n: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid STATESTATS_CONCURRENCY: {raw:?}"))?;
                if n == 0 {
                    anyhow::bail!("STATESTATS_CONCURRENCY must be at least 1");
                }
                n
            }
            None => defaults.concurrency,
        };

        Ok(Self {
            vocabulary,
            output_dir: get("STATESTATS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            zero_counts,
            concurrency,
        })
    }
}
