// Markdown report — a shareable write-up of one run.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};

use super::artifacts::RunSummary;

/// Escape characters that would break a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Render the report as a string.
pub fn render_report(summary: &RunSummary) -> String {
    let output = &summary.output;
    let words = summary.vocabulary.words();
    let mut md = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(md, "# State Topic Rankings\n");
    let _ = writeln!(
        md,
        "Generated {} from {} ({} documents).\n",
        summary.generated_at.format("%Y-%m-%d %H:%M UTC"),
        cell(&summary.corpus),
        summary.documents
    );
    let _ = writeln!(
        md,
        "Vocabulary: {} | zero counts: {}\n",
        words
            .iter()
            .map(|w| format!("`{w}`"))
            .collect::<Vec<_>>()
            .join(", "),
        summary.zero_counts
    );

    // Counts table
    let _ = writeln!(md, "## Word Counts\n");
    if output.counts.is_empty() {
        let _ = writeln!(md, "_No vocabulary words found._\n");
    } else {
        let mut by_state: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
        for r in &output.counts {
            by_state
                .entry(r.state.as_str())
                .or_default()
                .insert(r.word.as_str(), r.count);
        }
        let _ = writeln!(md, "| State | {} |", words.join(" | "));
        let _ = writeln!(md, "|---|{}", "---:|".repeat(words.len()));
        for (state, counts) in &by_state {
            let row: Vec<String> = words
                .iter()
                .map(|w| counts.get(w.as_str()).copied().unwrap_or(0).to_string())
                .collect();
            let _ = writeln!(md, "| {} | {} |", cell(state), row.join(" | "));
        }
        let _ = writeln!(md);
    }

    // Dominant states
    let _ = writeln!(md, "## Dominant States\n");
    if output.dominant.is_empty() {
        let _ = writeln!(md, "_No words observed._\n");
    } else {
        let _ = writeln!(md, "| Word | State | Count |");
        let _ = writeln!(md, "|---|---|---:|");
        for d in &output.dominant {
            let _ = writeln!(md, "| {} | {} | {} |", d.word, cell(d.state.as_str()), d.count);
        }
        let _ = writeln!(md);
    }

    // Signature groups
    let _ = writeln!(md, "## Signature Groups\n");
    if output.groups.is_empty() {
        let _ = writeln!(md, "_No signatures._\n");
    } else {
        let _ = writeln!(md, "| Signature | States | Count |");
        let _ = writeln!(md, "|---|---|---:|");
        for g in &output.groups {
            let _ = writeln!(
                md,
                "| `{}` | {} | {} |",
                g.signature,
                cell(&g.states_joined()),
                g.states.len()
            );
        }
        let _ = writeln!(md);
    }

    md
}

/// Render the report and write it to `path`.
pub fn generate_report(summary: &RunSummary, path: &str) -> Result<()> {
    std::fs::write(path, render_report(summary))
        .with_context(|| format!("Failed to write report to {path}"))?;
    Ok(())
}
