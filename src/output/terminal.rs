// Colored terminal output for the pipeline's artifacts.
//
// main.rs delegates all display here so the formatting stays in one place.

use std::collections::BTreeMap;

use colored::Colorize;

use crate::records::{DominantState, OccurrenceRecord, SignatureGroup, StateSignature};

use super::artifacts::RunSummary;

/// Display per-state counts as one row per state, one column per word.
pub fn display_counts(records: &[OccurrenceRecord], words: &[String]) {
    if records.is_empty() {
        println!("No vocabulary words found in the corpus.");
        return;
    }

    let mut by_state: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
    for r in records {
        by_state
            .entry(r.state.as_str())
            .or_default()
            .insert(r.word.as_str(), r.count);
    }

    println!(
        "\n{}",
        format!("=== Word Counts ({} states) ===", by_state.len()).bold()
    );
    println!();

    let mut header = format!("  {:<24}", "State".dimmed());
    for word in words {
        header.push_str(&format!(" {:>12}", word.dimmed()));
    }
    println!("{header}");
    println!("  {}", "-".repeat(24 + 13 * words.len()).dimmed());

    for (state, counts) in &by_state {
        let mut row = format!("  {:<24}", super::truncate_chars(state, 24));
        for word in words {
            let n = counts.get(word.as_str()).copied().unwrap_or(0);
            let cell = format!("{n:>12}");
            if n == 0 {
                row.push_str(&format!(" {}", cell.dimmed()));
            } else {
                row.push_str(&format!(" {cell}"));
            }
        }
        println!("{row}");
    }
    println!();
}

/// Display the dominant state for each word.
pub fn display_dominant(dominant: &[DominantState]) {
    println!("\n{}", "=== Dominant States ===".bold());
    println!();
    if dominant.is_empty() {
        println!("  {}", "(no words observed)".dimmed());
        println!();
        return;
    }
    for d in dominant {
        println!(
            "  {:<20} {} {} {}",
            d.word.bold(),
            "->".dimmed(),
            d.state.as_str().bright_green(),
            format!("({})", d.count).dimmed()
        );
    }
    println!();
}

/// Display each state's ranking signature.
pub fn display_signatures(signatures: &[StateSignature]) {
    println!("\n{}", "=== Ranking Signatures ===".bold());
    println!();
    if signatures.is_empty() {
        println!("  {}", "(no states)".dimmed());
        println!();
        return;
    }
    for s in signatures {
        println!(
            "  {:<24} {}",
            super::truncate_chars(s.state.as_str(), 24),
            colorize_signature(s.signature.as_str())
        );
    }
    println!();
}

/// Display states grouped by shared signature, largest groups first.
pub fn display_groups(groups: &[SignatureGroup]) {
    println!(
        "\n{}",
        format!("=== Signature Groups ({} distinct) ===", groups.len()).bold()
    );
    println!();

    let mut ordered: Vec<&SignatureGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| b.states.len().cmp(&a.states.len()));

    for group in ordered {
        let size = group.states.len();
        let size_str = if size > 1 {
            format!("{size} states").bright_yellow()
        } else {
            format!("{size} state").normal()
        };
        println!("  {}  [{}]", colorize_signature(group.signature.as_str()), size_str);
        println!(
            "      {}",
            super::truncate_chars(&group.states_joined(), 100).dimmed()
        );
    }
    println!();
}

/// One-paragraph summary after a full run.
pub fn display_summary(summary: &RunSummary) {
    println!("\n{}", "Run complete.".bold());
    println!("  Corpus: {}", summary.corpus);
    println!("  Documents: {}", summary.documents);
    println!("  States with vocabulary words: {}", summary.state_count());
    println!("  Distinct signatures: {}", summary.output.groups.len());
    println!(
        "  Vocabulary: {} (zero counts: {})",
        summary.vocabulary, summary.zero_counts
    );
}

/// Highlight the top word of a signature.
fn colorize_signature(signature: &str) -> String {
    match signature.split_once('>') {
        Some((top, rest)) => format!("{}{}{}", top.bright_cyan().bold(), ">".dimmed(), rest),
        None => signature.bright_cyan().bold().to_string(),
    }
}
