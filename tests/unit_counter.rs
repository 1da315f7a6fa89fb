// Unit tests for tokenization and counting.
//
// Tests the exact-match rules the Counter relies on: tag stripping, whitespace
// splitting, case sensitivity, and the absence of zero-valued records.

use statestats::corpus::Document;
use statestats::pipeline::counter::{strip_tags, Counter};
use statestats::records::OccurrenceRecord;
use statestats::vocabulary::Vocabulary;

fn counter() -> Counter {
    Counter::new(Vocabulary::default())
}

// ============================================================
// strip_tags
// ============================================================

#[test]
fn strip_tags_is_non_greedy() {
    assert_eq!(strip_tags("<a>sports</a> x <b>politics</b>"), "sports x politics");
}

#[test]
fn strip_tags_removes_attributes_and_self_closing_tags() {
    assert_eq!(
        strip_tags(r#"<div class="x">education</div><br/>"#),
        "education"
    );
}

#[test]
fn strip_tags_leaves_unmatched_brackets() {
    assert_eq!(strip_tags("a > b < c"), "a > b < c");
}

// ============================================================
// Token matching
// ============================================================

#[test]
fn punctuation_is_not_trimmed() {
    let doc = Document::new("X", "sports, sports. (sports) sports");
    let records = counter().count_document(&doc);
    assert_eq!(records, vec![OccurrenceRecord::new("X", "sports", 1)]);
}

#[test]
fn case_must_match_exactly() {
    let doc = Document::new("X", "Education EDUCATION education");
    let records = counter().count_document(&doc);
    assert_eq!(records, vec![OccurrenceRecord::new("X", "education", 1)]);
}

#[test]
fn tags_glue_adjacent_text_together() {
    // "sports<br>politics" becomes one token "sportspolitics"
    let doc = Document::new("X", "sports<br>politics");
    assert!(counter().count_document(&doc).is_empty());
}

#[test]
fn newlines_and_tabs_separate_tokens() {
    let doc = Document::new("X", "sports\npolitics\tsports\r\nagriculture");
    let records = counter().count_document(&doc);
    assert_eq!(
        records,
        vec![
            OccurrenceRecord::new("X", "agriculture", 1),
            OccurrenceRecord::new("X", "politics", 1),
            OccurrenceRecord::new("X", "sports", 2),
        ]
    );
}

#[test]
fn empty_document_yields_nothing() {
    assert!(counter().count_document(&Document::new("X", "")).is_empty());
    assert!(counter().count(&[]).unwrap().is_empty());
}

// ============================================================
// Corpus-level aggregation
// ============================================================

#[test]
fn one_record_per_state_word_pair() {
    let docs: Vec<Document> = (0..50)
        .map(|i| Document::new(if i % 2 == 0 { "Even" } else { "Odd" }, "sports politics sports"))
        .collect();
    let records = counter().count(&docs).unwrap();
    assert_eq!(
        records,
        vec![
            OccurrenceRecord::new("Even", "politics", 25),
            OccurrenceRecord::new("Even", "sports", 50),
            OccurrenceRecord::new("Odd", "politics", 25),
            OccurrenceRecord::new("Odd", "sports", 50),
        ]
    );
}

#[test]
fn document_order_does_not_change_counts() {
    let mut docs = vec![
        Document::new("A", "sports education"),
        Document::new("B", "politics politics"),
        Document::new("A", "education"),
    ];
    let forward = counter().count(&docs).unwrap();
    docs.reverse();
    let backward = counter().count(&docs).unwrap();
    assert_eq!(forward, backward);
}
