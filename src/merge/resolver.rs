/*!
 * Resolution of match results into the final merged track.
 *
 * Each match result becomes exactly one [`MergedEntry`]. For matched pairs the
 * configured preferences decide which side contributes text and which side
 * contributes timing; unmatched entries pass through from their own origin.
 * The merged set is then sorted by start time and re-indexed from 1.
 */

use std::fmt;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::app_config::MergeConfig;
use crate::errors::MergeError;
use crate::merge::matcher::MatchResult;

/// Where a merged entry's content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Built from a matched machine/human pair
    Merged,
    /// Machine entry with no counterpart
    MachineOnly,
    /// Human entry with no counterpart
    HumanOnly,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Merged => "merged",
            Self::MachineOnly => "machine_only",
            Self::HumanOnly => "human_only",
        };
        write!(f, "{}", name)
    }
}

/// Quality bucket of a matched pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    PerfectMatch,
    FuzzyMatch,
}

/// One entry of the final track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedEntry {
    /// Position in the final chronological order, starting at 1
    pub index: usize,
    pub start: f64,
    pub end: f64,
    /// Resolved display text
    pub text: String,
    pub provenance: Provenance,
    /// Only set for merged entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<MatchQuality>,
    /// Combined score of the pairing, 0 for unmatched entries
    pub score: f64,
    /// Machine candidate text, kept even when the human text won
    pub machine_text: Option<String>,
    /// Human candidate text, kept even when the machine text won
    pub human_text: Option<String>,
}

/// Counts of resolution outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub perfect_match: usize,
    pub fuzzy_match: usize,
    pub machine_only: usize,
    pub human_only: usize,
}

impl MergeStats {
    /// Number of matched pairs
    pub fn matched(&self) -> usize {
        self.perfect_match + self.fuzzy_match
    }

    /// Number of entries in the merged track
    pub fn total(&self) -> usize {
        self.matched() + self.machine_only + self.human_only
    }

    fn record(&mut self, entry: &MergedEntry) {
        match (entry.provenance, entry.quality) {
            (Provenance::Merged, Some(MatchQuality::PerfectMatch)) => self.perfect_match += 1,
            (Provenance::Merged, _) => self.fuzzy_match += 1,
            (Provenance::MachineOnly, _) => self.machine_only += 1,
            (Provenance::HumanOnly, _) => self.human_only += 1,
        }
    }
}

/// The merged track plus the statistics gathered while building it
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Entries sorted by start time
    pub entries: Vec<MergedEntry>,
    pub stats: MergeStats,
}

impl MergeOutcome {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Text and timing preferences applied to matched pairs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionPolicy {
    /// Take the human text for matched pairs
    pub prefer_human_text: bool,
    /// Take the machine timing for matched pairs
    pub prefer_machine_timing: bool,
    /// Scores strictly above this are perfect matches
    pub perfect_match_threshold: f64,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            prefer_human_text: true,
            prefer_machine_timing: true,
            perfect_match_threshold: 0.9,
        }
    }
}

impl ResolutionPolicy {
    pub fn from_config(config: &MergeConfig) -> Result<Self, MergeError> {
        if !(0.0..=1.0).contains(&config.perfect_match_threshold) {
            return Err(MergeError::InvalidPolicy(format!(
                "perfect match threshold must be within [0, 1], got {}",
                config.perfect_match_threshold
            )));
        }
        Ok(Self {
            prefer_human_text: config.prefer_human_text,
            prefer_machine_timing: config.prefer_machine_timing,
            perfect_match_threshold: config.perfect_match_threshold,
        })
    }

    /// Quality bucket for a matched score
    pub fn quality(&self, score: f64) -> MatchQuality {
        if score > self.perfect_match_threshold {
            MatchQuality::PerfectMatch
        } else {
            MatchQuality::FuzzyMatch
        }
    }
}

/// Builds the final track from match results
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    policy: ResolutionPolicy,
}

impl Resolver {
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Resolve every match result, then sort by start (stable) and re-index
    pub fn resolve(&self, results: &[MatchResult<'_>]) -> MergeOutcome {
        let mut entries: Vec<MergedEntry> = results.iter().map(|r| self.resolve_one(r)).collect();

        entries.sort_by(|a, b| a.start.total_cmp(&b.start));
        reindex(&mut entries);

        let mut stats = MergeStats::default();
        for entry in &entries {
            stats.record(entry);
        }
        debug!("Resolved {} entries: {:?}", entries.len(), stats);

        MergeOutcome { entries, stats }
    }

    fn resolve_one(&self, result: &MatchResult<'_>) -> MergedEntry {
        match *result {
            MatchResult::Matched { machine, human, score } => {
                let text = if self.policy.prefer_human_text { &human.text } else { &machine.text };
                let timing = if self.policy.prefer_machine_timing { machine } else { human };
                MergedEntry {
                    index: 0,
                    start: timing.start,
                    end: timing.end,
                    text: text.clone(),
                    provenance: Provenance::Merged,
                    quality: Some(self.policy.quality(score)),
                    score,
                    machine_text: Some(machine.text.clone()),
                    human_text: Some(human.text.clone()),
                }
            }
            MatchResult::MachineOnly(machine) => MergedEntry {
                index: 0,
                start: machine.start,
                end: machine.end,
                text: machine.text.clone(),
                provenance: Provenance::MachineOnly,
                quality: None,
                score: 0.0,
                machine_text: Some(machine.text.clone()),
                human_text: None,
            },
            MatchResult::HumanOnly(human) => MergedEntry {
                index: 0,
                start: human.start,
                end: human.end,
                text: human.text.clone(),
                provenance: Provenance::HumanOnly,
                quality: None,
                score: 0.0,
                machine_text: None,
                human_text: Some(human.text.clone()),
            },
        }
    }
}

/// Number entries 1..N in their current order
pub fn reindex(entries: &mut [MergedEntry]) {
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.index = i + 1;
    }
}
