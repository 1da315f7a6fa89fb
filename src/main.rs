use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use statestats::config::Config;
use statestats::corpus::{CorpusSource, DirectorySource, Document};
use statestats::output::{artifacts, markdown, terminal};
use statestats::pipeline::{Pipeline, PipelineOutput, ZeroCountPolicy};
use statestats::vocabulary::Vocabulary;

/// StateStats: which topics each state's text emphasizes.
///
/// Counts a fixed vocabulary of topic words in one document per state, finds
/// the state that uses each word most, ranks each state's words, and groups
/// states that rank them the same way.
#[derive(Parser)]
#[command(name = "statestats", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory for artifacts (overrides STATESTATS_OUTPUT_DIR)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Comma-separated vocabulary (overrides STATESTATS_VOCABULARY)
    #[arg(long, global = true)]
    vocabulary: Option<Vocabulary>,

    /// Whether unseen words appear in signatures: omit or include
    #[arg(long, global = true)]
    zero_counts: Option<ZeroCountPolicy>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all four stages over a corpus and write every artifact
    Run {
        /// Directory with one file per state (or a single file)
        corpus: PathBuf,

        /// Number of files to read in parallel (default: 8)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Skip the terminal tables, print only the summary
        #[arg(long)]
        quiet: bool,
    },

    /// Stage 1 only: count vocabulary words per state
    Count {
        /// Directory with one file per state (or a single file)
        corpus: PathBuf,

        /// Number of files to read in parallel (default: 8)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Stage 2 only: dominant state per word, from a counts artifact
    Dominant {
        /// Counts file (default: <output-dir>/statewise.tsv)
        counts: Option<PathBuf>,
    },

    /// Stage 3 only: ranking signature per state, from a counts artifact
    Rank {
        /// Counts file (default: <output-dir>/statewise.tsv)
        counts: Option<PathBuf>,
    },

    /// Stage 4 only: group states by signature, from a signatures artifact
    Group {
        /// Signatures file (default: <output-dir>/rankings.tsv)
        signatures: Option<PathBuf>,
    },

    /// Regenerate the Markdown report from a previous run's summary
    Report {
        /// Summary file (default: <output-dir>/summary.json)
        summary: Option<PathBuf>,
    },

    /// Show the active vocabulary
    Vocabulary,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("statestats=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(vocabulary) = cli.vocabulary {
        config.vocabulary = vocabulary;
    }
    if let Some(policy) = cli.zero_counts {
        config.zero_counts = policy;
    }

    let pipeline = Pipeline::new(config.vocabulary.clone(), config.zero_counts);

    match cli.command {
        Commands::Run {
            corpus,
            concurrency,
            quiet,
        } => {
            let source = DirectorySource::new(&corpus, concurrency.unwrap_or(config.concurrency));
            let documents = load_corpus(&source).await?;
            let document_count = documents.len();

            println!(
                "Running pipeline over {} documents ({} words)...",
                document_count,
                config.vocabulary.len()
            );
            let output = run_pipeline(pipeline, documents).await?;

            if !quiet {
                terminal::display_counts(&output.counts, config.vocabulary.words());
                terminal::display_dominant(&output.dominant);
                terminal::display_signatures(&output.signatures);
                terminal::display_groups(&output.groups);
            }

            let summary = artifacts::RunSummary::new(
                source.describe(),
                config.vocabulary.clone(),
                config.zero_counts,
                document_count,
                output,
            );
            let written = artifacts::write_all(&config.output_dir, &summary)?;

            let report_path = config.output_dir.join("report.md");
            markdown::generate_report(&summary, &report_path.to_string_lossy())?;

            terminal::display_summary(&summary);
            println!("  Artifacts:");
            for path in written.iter().chain(std::iter::once(&report_path)) {
                println!("    {}", path.display().to_string().dimmed());
            }
        }

        Commands::Count {
            corpus,
            concurrency,
        } => {
            let source = DirectorySource::new(&corpus, concurrency.unwrap_or(config.concurrency));
            let documents = load_corpus(&source).await?;
            let counts = pipeline
                .count(&documents)
                .context("Pipeline aborted")?;

            terminal::display_counts(&counts, config.vocabulary.words());
            let path =
                artifacts::write_records(&config.output_dir, artifacts::COUNTS_FILE, &counts)?;
            println!("Counts written to {}", path.display());
        }

        Commands::Dominant { counts } => {
            let path = counts.unwrap_or_else(|| config.output_dir.join(artifacts::COUNTS_FILE));
            let input = artifacts::read_artifact(&path)?;
            let dominant = pipeline
                .dominant_from_counts(&input)
                .with_context(|| format!("Pipeline aborted reading {}", path.display()))?;

            terminal::display_dominant(&dominant);
            let out = artifacts::write_records(
                &config.output_dir,
                artifacts::DOMINANT_FILE,
                &dominant,
            )?;
            println!("Dominant states written to {}", out.display());
        }

        Commands::Rank { counts } => {
            let path = counts.unwrap_or_else(|| config.output_dir.join(artifacts::COUNTS_FILE));
            let input = artifacts::read_artifact(&path)?;
            let signatures = pipeline
                .signatures_from_counts(&input)
                .with_context(|| format!("Pipeline aborted reading {}", path.display()))?;

            terminal::display_signatures(&signatures);
            let out = artifacts::write_records(
                &config.output_dir,
                artifacts::SIGNATURES_FILE,
                &signatures,
            )?;
            println!("Signatures written to {}", out.display());
        }

        Commands::Group { signatures } => {
            let path =
                signatures.unwrap_or_else(|| config.output_dir.join(artifacts::SIGNATURES_FILE));
            let input = artifacts::read_artifact(&path)?;
            let groups = pipeline
                .groups_from_signatures(&input)
                .with_context(|| format!("Pipeline aborted reading {}", path.display()))?;

            terminal::display_groups(&groups);
            let out =
                artifacts::write_records(&config.output_dir, artifacts::GROUPS_FILE, &groups)?;
            println!("Groups written to {}", out.display());
        }

        Commands::Report { summary } => {
            let path =
                summary.unwrap_or_else(|| config.output_dir.join(artifacts::SUMMARY_FILE));
            let summary = artifacts::read_summary(&path)?;
            let report_path = report_path_for(&path);
            markdown::generate_report(&summary, &report_path.to_string_lossy())?;
            println!("Report written to {}", report_path.display());
        }

        Commands::Vocabulary => {
            println!("{}", "Active vocabulary (tie-break order):".bold());
            for (i, word) in config.vocabulary.words().iter().enumerate() {
                println!("  {:>2}. {}", i + 1, word);
            }
            println!("Zero-count words: {}", config.zero_counts);
        }
    }

    Ok(())
}

/// Load every document from a corpus source, logging where it came from.
async fn load_corpus(source: &dyn CorpusSource) -> Result<Vec<Document>> {
    info!(source = %source.describe(), "Loading corpus");
    let documents = source.load().await?;
    if documents.is_empty() {
        println!("{}", "Corpus is empty; every artifact will be empty.".yellow());
    }
    Ok(documents)
}

/// Run the CPU-bound pipeline off the async runtime.
async fn run_pipeline(pipeline: Pipeline, documents: Vec<Document>) -> Result<PipelineOutput> {
    let output = tokio::task::spawn_blocking(move || pipeline.run(&documents))
        .await
        .context("Pipeline worker failed")?
        .context("Pipeline aborted")?;
    Ok(output)
}

/// report.md next to the given summary file.
fn report_path_for(summary: &Path) -> PathBuf {
    summary
        .parent()
        .map(|dir| dir.join("report.md"))
        .unwrap_or_else(|| PathBuf::from("report.md"))
}
