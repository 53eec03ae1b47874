/*!
 * Greedy first-fit matching of machine entries against human entries.
 */

use std::collections::HashSet;
use log::debug;

use crate::merge::scoring::ScoringPolicy;
use crate::subtitle_processor::SubtitleEntry;

/// Outcome of matching for one machine entry or one leftover human entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    /// A machine entry paired with a human entry
    Matched {
        machine: &'a SubtitleEntry,
        human: &'a SubtitleEntry,
        score: f64,
    },
    /// A machine entry with no acceptable counterpart
    MachineOnly(&'a SubtitleEntry),
    /// A human entry no machine entry claimed
    HumanOnly(&'a SubtitleEntry),
}

impl<'a> MatchResult<'a> {
    /// Combined score of the pairing, 0 when unmatched
    pub fn score(&self) -> f64 {
        match self {
            Self::Matched { score, .. } => *score,
            _ => 0.0,
        }
    }

    pub fn machine(&self) -> Option<&'a SubtitleEntry> {
        match self {
            Self::Matched { machine, .. } | Self::MachineOnly(machine) => Some(*machine),
            Self::HumanOnly(_) => None,
        }
    }

    pub fn human(&self) -> Option<&'a SubtitleEntry> {
        match self {
            Self::Matched { human, .. } | Self::HumanOnly(human) => Some(*human),
            Self::MachineOnly(_) => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Pairs machine entries with human entries using a [`ScoringPolicy`]
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    policy: ScoringPolicy,
}

impl Matcher {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Match every machine entry, in order, against the human entries
    ///
    /// Each machine entry takes the best-scoring human entry not yet consumed,
    /// provided the score clears the acceptance threshold. Earlier machine
    /// entries win contested human entries. Unclaimed human entries are
    /// appended as [`MatchResult::HumanOnly`] in input order.
    pub fn match_entries<'a>(
        &self,
        machine: &'a [SubtitleEntry],
        human: &'a [SubtitleEntry],
    ) -> Vec<MatchResult<'a>> {
        let mut consumed: HashSet<usize> = HashSet::with_capacity(human.len());
        let mut results = Vec::with_capacity(machine.len() + human.len());

        for m in machine {
            match self.best_candidate(m, human, &consumed) {
                Some((pos, score)) if self.policy.accepts(score) => {
                    consumed.insert(pos);
                    debug!("Machine #{} matched human #{} (score {:.3})", m.index, human[pos].index, score);
                    results.push(MatchResult::Matched { machine: m, human: &human[pos], score });
                }
                best => {
                    debug!("Machine #{} unmatched (best score {:.3})", m.index, best.map_or(0.0, |(_, s)| s));
                    results.push(MatchResult::MachineOnly(m));
                }
            }
        }

        results.extend(
            human.iter()
                .enumerate()
                .filter(|(pos, _)| !consumed.contains(pos))
                .map(|(_, h)| MatchResult::HumanOnly(h)),
        );

        results
    }

    // First-encountered candidate wins ties
    fn best_candidate(
        &self,
        machine: &SubtitleEntry,
        human: &[SubtitleEntry],
        consumed: &HashSet<usize>,
    ) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (pos, h) in human.iter().enumerate() {
            if consumed.contains(&pos) {
                continue;
            }
            let score = self.policy.combined_score(machine, h);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }

        best
    }
}
