// Pipeline orchestrator — runs the four stages in order.
//
//   Counter ──barrier──┬── DominantStateResolver
//                      └── SignatureBuilder ──barrier── SignatureGrouper
//
// Each stage is a pure function from one complete dataset to the next. The
// dominant-state and signature stages only read the counts, so they run side
// by side. A failing stage stops everything after it.

use std::convert::Infallible;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::corpus::Document;
use crate::errors::{PipelineError, Stage};
use crate::records::codec::{parse_counts, parse_lines};
use crate::records::{DominantState, OccurrenceRecord, SignatureGroup, StateSignature};
use crate::vocabulary::Vocabulary;

use super::counter::Counter;
use super::dominant::DominantStateResolver;
use super::grouper::SignatureGrouper;
use super::shuffle;
use super::signature::{SignatureBuilder, ZeroCountPolicy};

/// Everything the pipeline produces, one field per artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub counts: Vec<OccurrenceRecord>,
    pub dominant: Vec<DominantState>,
    pub signatures: Vec<StateSignature>,
    pub groups: Vec<SignatureGroup>,
}

/// The configured four-stage pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    counter: Counter,
    resolver: DominantStateResolver,
    builder: SignatureBuilder,
    grouper: SignatureGrouper,
}

impl Pipeline {
    pub fn new(vocabulary: Vocabulary, zero_counts: ZeroCountPolicy) -> Self {
        Self {
            counter: Counter::new(vocabulary.clone()),
            resolver: DominantStateResolver,
            builder: SignatureBuilder::new(vocabulary, zero_counts),
            grouper: SignatureGrouper,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.counter.vocabulary()
    }

    /// Run all four stages over an in-memory corpus.
    pub fn run(&self, documents: &[Document]) -> Result<PipelineOutput, PipelineError> {
        let counts = self.count(documents)?;

        let (dominant, signatures) = rayon::join(
            || self.dominant(&counts),
            || self.signatures(&counts),
        );
        let groups = self.groups(&signatures);

        Ok(PipelineOutput {
            counts,
            dominant,
            signatures,
            groups,
        })
    }

    /// Stage 1.
    pub fn count(&self, documents: &[Document]) -> Result<Vec<OccurrenceRecord>, PipelineError> {
        timed(Stage::Counter, || self.counter.count(documents))
    }

    /// Stage 2, from complete stage-1 output.
    pub fn dominant(&self, counts: &[OccurrenceRecord]) -> Vec<DominantState> {
        infallible(Stage::DominantState, || {
            self.resolver.resolve(&shuffle::by_word(counts))
        })
    }

    /// Stage 3, from complete stage-1 output.
    pub fn signatures(&self, counts: &[OccurrenceRecord]) -> Vec<StateSignature> {
        infallible(Stage::SignatureBuilder, || {
            self.builder.build(&shuffle::by_state(counts))
        })
    }

    /// Stage 4, from complete stage-3 output.
    pub fn groups(&self, signatures: &[StateSignature]) -> Vec<SignatureGroup> {
        infallible(Stage::SignatureGrouper, || {
            self.grouper.group(shuffle::by_signature(signatures))
        })
    }

    /// Stage 2 from a serialized counts artifact.
    pub fn dominant_from_counts(&self, counts: &str) -> Result<Vec<DominantState>, PipelineError> {
        let counts = parse_counts_input(Stage::DominantState, counts)?;
        Ok(self.dominant(&counts))
    }

    /// Stage 3 from a serialized counts artifact.
    pub fn signatures_from_counts(
        &self,
        counts: &str,
    ) -> Result<Vec<StateSignature>, PipelineError> {
        let counts = parse_counts_input(Stage::SignatureBuilder, counts)?;
        Ok(self.signatures(&counts))
    }

    /// Stage 4 from a serialized signatures artifact.
    pub fn groups_from_signatures(
        &self,
        signatures: &str,
    ) -> Result<Vec<SignatureGroup>, PipelineError> {
        let signatures = parse_stage_input(Stage::SignatureGrouper, signatures)?;
        Ok(self.groups(&signatures))
    }
}

fn parse_counts_input(
    stage: Stage,
    input: &str,
) -> Result<Vec<OccurrenceRecord>, PipelineError> {
    parse_counts(input).map_err(|e| PipelineError::new(stage, e))
}

fn parse_stage_input<T>(stage: Stage, input: &str) -> Result<Vec<T>, PipelineError>
where
    T: std::str::FromStr<Err = crate::errors::RecordError>,
{
    parse_lines(input).map_err(|e| PipelineError::new(stage, e))
}

/// Run a stage inside a tracing span and log how long it took.
fn timed<T, E, F>(stage: Stage, f: F) -> Result<Vec<T>, E>
where
    F: FnOnce() -> Result<Vec<T>, E>,
{
    let _span = info_span!("pipeline_stage", stage = stage.name()).entered();
    let started = Instant::now();
    let out = f()?;
    info!(
        stage = stage.name(),
        records = out.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Stage complete"
    );
    Ok(out)
}

fn infallible<T, F>(stage: Stage, f: F) -> Vec<T>
where
    F: FnOnce() -> Vec<T>,
{
    match timed::<T, Infallible, _>(stage, || Ok(f())) {
        Ok(out) => out,
        Err(never) => match never {},
    }
}
