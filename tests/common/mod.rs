/*!
 * Common test utilities for the submerge test suite
 */

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use submerge::subtitle_processor::{Origin, SubtitleEntry};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Machine entry with a two second duration
pub fn machine(index: usize, start: f64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(index, start, start + 2.0, text, Origin::Machine)
}

/// Human entry with a two second duration
pub fn human(index: usize, start: f64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(index, start, start + 2.0, text, Origin::Human)
}

/// Transcription output in the indexed delimited layout
pub const WHISPER_TRACK: &str = "# Whisper Auto-Generated Subtitles (Segment Level)
# Format: index | start | end | text
# This is automatic - may need corrections

1 | 1.00 | 3.00 | helo there my frend
2 | 4.00 | 6.50 | how are you doing today
3 | 20.00 | 22.00 | completely unrelated noise
";

/// Manually written track
pub const MANUAL_TRACK: &str = "# Manual subtitles
# Format: index | start | end | text

1 | 1.20 | 3.10 | hello there my friend
2 | 4.30 | 6.40 | how are you doing today
3 | 30.00 | 32.00 | a closing line nobody transcribed
";

/// Creates both sample tracks in the given directory
pub fn create_sample_tracks(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let machine = create_test_file(dir, "whisper_subtitles.txt", WHISPER_TRACK)?;
    let human = create_test_file(dir, "manual_subtitles.txt", MANUAL_TRACK)?;
    Ok((machine, human))
}
