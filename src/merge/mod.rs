/*!
 * Merge engine for machine and human subtitle tracks.
 *
 * - `scoring`: Text similarity, time proximity and the combined score
 * - `matcher`: Greedy first-fit pairing with one-to-one consumption
 * - `resolver`: Text/timing policy, chronological ordering, statistics
 * - `report`: Human-readable audit report
 * - `export`: Delimited, JSON and SRT renderings of the merged track
 *
 * The whole merge is a pure function of its inputs and policy: no I/O, no
 * shared state, identical output for identical input.
 */

pub mod scoring;
pub mod matcher;
pub mod resolver;
pub mod report;
pub mod export;

use log::{info, warn};

pub use scoring::{ScoringPolicy, text_similarity};
pub use matcher::{MatchResult, Matcher};
pub use resolver::{MatchQuality, MergeOutcome, MergeStats, MergedEntry, Provenance, ResolutionPolicy, Resolver};
pub use report::MergeReport;

use crate::app_config::MergeConfig;
use crate::errors::MergeError;
use crate::subtitle_processor::SubtitleEntry;

/// Runs matching and resolution for a pair of tracks
#[derive(Debug, Clone, Default)]
pub struct SubtitleMerger {
    matcher: Matcher,
    resolver: Resolver,
}

impl SubtitleMerger {
    pub fn new(scoring: ScoringPolicy, resolution: ResolutionPolicy) -> Self {
        Self {
            matcher: Matcher::new(scoring),
            resolver: Resolver::new(resolution),
        }
    }

    /// Build a merger from configuration, validating every policy value
    pub fn from_config(config: &MergeConfig) -> Result<Self, MergeError> {
        Ok(Self::new(
            ScoringPolicy::from_config(config)?,
            ResolutionPolicy::from_config(config)?,
        ))
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Merge a machine track with a human track
    ///
    /// When one side is empty the other passes through unmatched without
    /// running the matcher. Both sides empty is reported as
    /// [`MergeError::NothingToMerge`].
    pub fn merge(&self, machine: &[SubtitleEntry], human: &[SubtitleEntry]) -> Result<MergeOutcome, MergeError> {
        let results: Vec<MatchResult<'_>> = match (machine.is_empty(), human.is_empty()) {
            (true, true) => return Err(MergeError::NothingToMerge),
            (false, true) => {
                warn!("No human subtitles, using machine track only");
                machine.iter().map(MatchResult::MachineOnly).collect()
            }
            (true, false) => {
                warn!("No machine subtitles, using human track only");
                human.iter().map(MatchResult::HumanOnly).collect()
            }
            (false, false) => {
                info!("Matching {} machine entries against {} human entries", machine.len(), human.len());
                self.matcher.match_entries(machine, human)
            }
        };

        let outcome = self.resolver.resolve(&results);
        info!("Merged track: {}", outcome.report().summary());
        Ok(outcome)
    }
}
