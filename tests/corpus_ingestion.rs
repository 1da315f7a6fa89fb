// Integration tests for corpus loading and artifact files.
//
// Each test builds its own directory under the system temp dir and removes
// it afterwards.

use std::path::PathBuf;

use statestats::corpus::{CorpusSource, DirectorySource, MemorySource};
use statestats::errors::Stage;
use statestats::output::artifacts::{self, RunSummary};
use statestats::pipeline::{Pipeline, ZeroCountPolicy};
use statestats::vocabulary::Vocabulary;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("statestats_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn directory_source_derives_states_from_file_names() {
    let dir = scratch_dir("names");
    std::fs::write(dir.join("Ohio"), "sports <b>sports</b>").unwrap();
    std::fs::write(dir.join("Iowa"), "agriculture").unwrap();
    std::fs::write(dir.join(".hidden"), "politics").unwrap();
    std::fs::create_dir_all(dir.join("nested")).unwrap();

    let docs = DirectorySource::new(&dir, 2).load().await.unwrap();
    let states: Vec<&str> = docs.iter().map(|d| d.state.as_str()).collect();
    assert_eq!(states, vec!["Iowa", "Ohio"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn job_marker_files_are_skipped() {
    let dir = scratch_dir("markers");
    std::fs::write(dir.join("Ohio"), "sports").unwrap();
    std::fs::write(dir.join("_SUCCESS"), "").unwrap();
    std::fs::write(dir.join("_logs"), "politics").unwrap();

    let docs = DirectorySource::new(&dir, 2).load().await.unwrap();
    let states: Vec<&str> = docs.iter().map(|d| d.state.as_str()).collect();
    assert_eq!(states, vec!["Ohio"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_state_files_are_followed() {
    let dir = scratch_dir("symlinks");
    let elsewhere = scratch_dir("symlink_targets");
    std::fs::write(elsewhere.join("kansas.txt"), "agriculture").unwrap();
    std::os::unix::fs::symlink(elsewhere.join("kansas.txt"), dir.join("Kansas")).unwrap();
    std::os::unix::fs::symlink(elsewhere.join("missing"), dir.join("Broken")).unwrap();

    let docs = DirectorySource::new(&dir, 2).load().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].state.as_str(), "Kansas");
    assert_eq!(docs[0].text, "agriculture");

    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::remove_dir_all(&elsewhere);
}

#[tokio::test]
async fn single_file_is_a_one_document_corpus() {
    let dir = scratch_dir("single");
    let file = dir.join("Texas");
    std::fs::write(&file, "politics").unwrap();

    let docs = DirectorySource::new(&file, 4).load().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].state.as_str(), "Texas");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn empty_directory_is_not_an_error() {
    let dir = scratch_dir("empty");
    let docs = DirectorySource::new(&dir, 8).load().await.unwrap();
    assert!(docs.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn missing_directory_is_an_error() {
    let dir = std::env::temp_dir().join("statestats_definitely_missing_dir");
    let _ = std::fs::remove_dir_all(&dir);
    assert!(DirectorySource::new(&dir, 8).load().await.is_err());
}

#[tokio::test]
async fn invalid_utf8_is_replaced_not_rejected() {
    let dir = scratch_dir("utf8");
    std::fs::write(dir.join("Maine"), b"sports \xff\xfe politics").unwrap();

    let docs = DirectorySource::new(&dir, 1).load().await.unwrap();
    let out = Pipeline::new(Vocabulary::default(), ZeroCountPolicy::Omit)
        .run(&docs)
        .unwrap();
    assert_eq!(out.counts.len(), 2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn memory_source_derives_states_from_names() {
    let source = MemorySource::from_named([("in/A", "sports"), ("in/B", "politics")]);
    let docs = source.load().await.unwrap();
    assert_eq!(docs[0].state.as_str(), "A");
    assert_eq!(docs[1].state.as_str(), "B");
    assert!(source.describe().contains("2"));
}

#[tokio::test]
async fn artifacts_round_trip_through_staged_runs() {
    let dir = scratch_dir("artifacts");
    let source = MemorySource::from_named([
        ("A", "<b>sports</b> sports politics"),
        ("B", "education education sports"),
        ("C", "sports sports politics"),
    ]);
    let docs = source.load().await.unwrap();
    let pipeline = Pipeline::new(Vocabulary::default(), ZeroCountPolicy::Omit);
    let output = pipeline.run(&docs).unwrap();

    let summary = RunSummary::new(
        source.describe(),
        Vocabulary::default(),
        ZeroCountPolicy::Omit,
        docs.len(),
        output.clone(),
    );
    let written = artifacts::write_all(&dir, &summary).unwrap();
    assert_eq!(written.len(), 5);

    let counts = artifacts::read_artifact(&dir.join(artifacts::COUNTS_FILE)).unwrap();
    assert!(counts.starts_with("A:politics\t1\nA:sports\t2\n"));
    assert_eq!(pipeline.dominant_from_counts(&counts).unwrap(), output.dominant);
    assert_eq!(
        pipeline.signatures_from_counts(&counts).unwrap(),
        output.signatures
    );

    let groups = artifacts::read_artifact(&dir.join(artifacts::GROUPS_FILE)).unwrap();
    assert!(groups.contains("sports>politics\tA,C\n"));

    let dominant = artifacts::read_artifact(&dir.join(artifacts::DOMINANT_FILE)).unwrap();
    assert!(dominant.contains("education\tB\n"));

    let reloaded = artifacts::read_summary(&dir.join(artifacts::SUMMARY_FILE)).unwrap();
    assert_eq!(reloaded.output, output);
    assert_eq!(reloaded.documents, 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn file_names_that_break_artifacts_are_rejected() {
    let dir = scratch_dir("bad_state");
    std::fs::write(dir.join("Ohio"), "sports").unwrap();
    std::fs::write(dir.join("North,Carolina"), "politics").unwrap();

    let err = DirectorySource::new(&dir, 2).load().await.unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("North,Carolina"), "got: {msg}");
    assert!(msg.contains("reserved character ','"), "got: {msg}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn unusable_state_names_never_reach_the_artifacts() {
    let pipeline = Pipeline::new(Vocabulary::default(), ZeroCountPolicy::Omit);
    for name in ["in/", "in/North,Carolina", "in/Tab\tState"] {
        let docs = MemorySource::from_named([(name, "sports")]).load().await.unwrap();
        let err = pipeline.run(&docs).unwrap_err();
        assert_eq!(err.stage, Stage::Counter, "name {name:?}");
    }

    // a signatures artifact edited by hand can't smuggle one in either
    let err = pipeline.groups_from_signatures("sports\tNorth,Carolina\n").unwrap_err();
    assert_eq!(err.stage, Stage::SignatureGrouper);
}
