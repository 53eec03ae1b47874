/*!
 * Audit report of a merge.
 *
 * The report is a borrowed view over a [`MergeOutcome`]: merged entries already
 * carry their score and both candidate texts, so every resolution decision
 * can be audited without re-running the matcher.
 */

use std::fmt;
use serde::Serialize;

use crate::merge::resolver::{MergeOutcome, MergeStats, MergedEntry};

const SEPARATOR_WIDTH: usize = 70;

/// Summary counts plus one block per merged entry
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MergeReport<'a> {
    pub stats: &'a MergeStats,
    pub total: usize,
    pub entries: &'a [MergedEntry],
}

impl<'a> MergeReport<'a> {
    pub fn new(outcome: &'a MergeOutcome) -> Self {
        Self {
            stats: &outcome.stats,
            total: outcome.entries.len(),
            entries: &outcome.entries,
        }
    }

    /// One-line summary suitable for logging
    pub fn summary(&self) -> String {
        format!(
            "{} entries: {} perfect, {} fuzzy, {} machine only, {} human only",
            self.total,
            self.stats.perfect_match,
            self.stats.fuzzy_match,
            self.stats.machine_only,
            self.stats.human_only
        )
    }
}

impl fmt::Display for MergeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(SEPARATOR_WIDTH);
        writeln!(f, "{}", rule)?;
        writeln!(f, "SUBTITLE MERGE REPORT")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(f, "MERGE STATISTICS:")?;
        writeln!(f, "  Perfect matches: {}", self.stats.perfect_match)?;
        writeln!(f, "  Fuzzy matches: {}", self.stats.fuzzy_match)?;
        writeln!(f, "  Machine only: {}", self.stats.machine_only)?;
        writeln!(f, "  Human only: {}", self.stats.human_only)?;
        writeln!(f, "  Total: {}", self.total)?;
        writeln!(f)?;
        writeln!(f, "DETAILED COMPARISON:")?;
        writeln!(f, "{}", rule)?;

        for entry in self.entries {
            writeln!(f)?;
            writeln!(f, "[{}] {:.2}s - {:.2}s", entry.index, entry.start, entry.end)?;
            writeln!(f, "Provenance: {}", entry.provenance)?;
            if entry.score > 0.0 {
                writeln!(f, "Match score: {:.2}%", entry.score * 100.0)?;
            }
            writeln!(f, "Final text: {}", entry.text)?;
            if let Some(text) = &entry.machine_text {
                writeln!(f, "Machine: {}", text)?;
            }
            if let Some(text) = &entry.human_text {
                writeln!(f, "Human: {}", text)?;
            }
            writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        }

        Ok(())
    }
}

impl MergeOutcome {
    pub fn report(&self) -> MergeReport<'_> {
        MergeReport::new(self)
    }
}
