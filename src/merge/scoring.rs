/*!
 * Pair scoring for the matcher.
 *
 * Two entries are compared on their text (Ratcliff/Obershelp ratio over the
 * whitespace-stripped characters) and on how close their start times are.
 * The weighted sum of both is the combined score used to accept a pairing.
 */

use crate::app_config::MergeConfig;
use crate::errors::MergeError;
use crate::subtitle_processor::SubtitleEntry;

/// Weights, window and threshold used to score a candidate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    /// Weight of the text similarity in the combined score
    pub text_weight: f64,
    /// Weight of the time proximity in the combined score
    pub time_weight: f64,
    /// Start-time distance (seconds) at which proximity reaches zero
    pub time_window_secs: f64,
    /// Minimum combined score for a pairing to be accepted
    pub acceptance_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            text_weight: 0.7,
            time_weight: 0.3,
            time_window_secs: 5.0,
            acceptance_threshold: 0.6,
        }
    }
}

impl ScoringPolicy {
    /// Build a policy from the merge configuration, rejecting unusable values
    pub fn from_config(config: &MergeConfig) -> Result<Self, MergeError> {
        let policy = Self {
            text_weight: config.text_weight,
            time_weight: config.time_weight,
            time_window_secs: config.time_window_secs,
            acceptance_threshold: config.acceptance_threshold,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check that every score this policy produces stays within [0, 1]
    pub fn validate(&self) -> Result<(), MergeError> {
        let weights = [self.text_weight, self.time_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MergeError::InvalidPolicy(format!(
                "weights must be non-negative, got text={} time={}",
                self.text_weight, self.time_weight
            )));
        }
        if ((self.text_weight + self.time_weight) - 1.0).abs() > 1e-6 {
            return Err(MergeError::InvalidPolicy(format!(
                "weights must sum to 1.0, got {}",
                self.text_weight + self.time_weight
            )));
        }
        if !self.time_window_secs.is_finite() || self.time_window_secs <= 0.0 {
            return Err(MergeError::InvalidPolicy(format!(
                "time window must be positive, got {}",
                self.time_window_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.acceptance_threshold) {
            return Err(MergeError::InvalidPolicy(format!(
                "acceptance threshold must be within [0, 1], got {}",
                self.acceptance_threshold
            )));
        }
        Ok(())
    }

    /// Proximity of two start times, 1.0 when equal and 0.0 beyond the window
    pub fn time_score(&self, machine_start: f64, human_start: f64) -> f64 {
        let diff = (machine_start - human_start).abs();
        let score = (1.0 - diff / self.time_window_secs).max(0.0);
        if score.is_finite() { score } else { 0.0 }
    }

    /// Weighted sum of text similarity and time proximity
    pub fn combined_score(&self, machine: &SubtitleEntry, human: &SubtitleEntry) -> f64 {
        let text = text_similarity(&machine.text, &human.text);
        let time = self.time_score(machine.start, human.start);
        (self.text_weight * text + self.time_weight * time).clamp(0.0, 1.0)
    }

    /// Whether a combined score clears the acceptance threshold
    pub fn accepts(&self, score: f64) -> bool {
        score >= self.acceptance_threshold
    }
}

/// Similarity ratio of two texts in [0, 1], ignoring all whitespace
///
/// Computed as `2 * M / (len(a) + len(b))` where `M` is the number of
/// characters in matching blocks found by recursively taking the longest
/// common substring. Empty text on either side scores 0.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matches = matching_characters(&a, &b);
    (2.0 * matches as f64) / (a.len() + b.len()) as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_common_block(a, alo, ahi, b, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`
///
/// Returns `(i, j, size)`; on ties the block starting earliest in `a`, then
/// earliest in `b`, wins.
fn longest_common_block(
    a: &[char],
    alo: usize,
    ahi: usize,
    b: &[char],
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    // run[k + 1] = length of the common run ending at a[i - 1], b[blo + k]
    let mut prev_run = vec![0usize; width + 1];
    let mut curr_run = vec![0usize; width + 1];

    for i in alo..ahi {
        for k in 0..width {
            let j = blo + k;
            curr_run[k + 1] = if a[i] == b[j] { prev_run[k] + 1 } else { 0 };
            let size = curr_run[k + 1];
            if size > best.2 {
                best = (i + 1 - size, j + 1 - size, size);
            }
        }
        std::mem::swap(&mut prev_run, &mut curr_run);
    }

    best
}
