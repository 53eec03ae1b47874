/*!
 * Serialization of the merged track.
 *
 * - Delimited text: `start | end | text`, one entry per line, line breaks
 *   in the text escaped as `\n`
 * - JSON: array of [`MergedEntry`] records
 * - SRT: numbered SubRip blocks
 */

use std::fmt::Write;
use anyhow::{Result, Context};

use crate::merge::resolver::MergeOutcome;
use crate::subtitle_processor::{escape_line_breaks, SubtitleEntry};

/// Header written before the delimited track
pub const DELIMITED_HEADER: &str = "# Final Merged Subtitles\n# Format: start | end | text\n";

impl MergeOutcome {
    /// Render the track as delimited lines
    pub fn to_delimited_string(&self) -> String {
        let mut out = String::from(DELIMITED_HEADER);
        out.push('\n');
        for entry in &self.entries {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{:.2} | {:.2} | {}", entry.start, entry.end, escape_line_breaks(&entry.text));
        }
        out
    }

    /// Render the track as pretty-printed JSON records
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize merged track to JSON")
    }

    /// Render the track as SubRip
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "{}", entry.index);
            let _ = writeln!(
                out,
                "{} --> {}",
                SubtitleEntry::format_timestamp(entry.start),
                SubtitleEntry::format_timestamp(entry.end)
            );
            let _ = writeln!(out, "{}", entry.text);
            out.push('\n');
        }
        out
    }
}
