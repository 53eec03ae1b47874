use std::fmt;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;

// @module: Subtitle loading and normalization

// @const: SRT timestamp regex (comma or dot before the milliseconds)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{1,2}:\d{2}:\d{2}[,.]\d{3})").unwrap()
});

/// Provenance of a subtitle entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Produced by a speech-recognition pass
    Machine,
    /// Authored or corrected by a person
    Human,
}

impl Origin {
    /// Minimum number of pipe-separated fields a delimited line needs
    pub fn min_fields(&self) -> usize {
        match self {
            Self::Machine => 3,
            Self::Human => 4,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Machine => write!(f, "machine"),
            Self::Human => write!(f, "human"),
        }
    }
}

// @struct: Canonical subtitle record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleEntry {
    // @field: Source-local sequence position
    pub index: usize,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Display text, may contain line breaks
    pub text: String,

    // @field: Where the entry came from
    pub origin: Origin,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without validation
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>, origin: Origin) -> Self {
        SubtitleEntry {
            index,
            start,
            end,
            text: text.into(),
            origin,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Positive index, finite non-negative timing, non-empty text
    pub fn new_validated(index: usize, start: f64, end: f64, text: &str, origin: Origin) -> Result<Self, SubtitleError> {
        if index == 0 {
            return Err(SubtitleError::InvalidIndex(index.to_string()));
        }
        let start = check_seconds(start, "start")?;
        let end = check_seconds(end, "end")?;

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(SubtitleError::EmptyText);
        }

        if end <= start {
            debug!("Entry {} ({}) has end {:.2} <= start {:.2}", index, origin, end, start);
        }

        Ok(SubtitleEntry::new(index, start, end, trimmed_text, origin))
    }

    /// Duration of the entry in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Returns a copy moved by `offset` seconds, clamped at zero
    pub fn shifted(&self, offset: f64) -> Self {
        SubtitleEntry {
            start: (self.start + offset).max(0.0),
            end: (self.end + offset).max(0.0),
            ..self.clone()
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to seconds
    pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow::anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow::anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok((hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0)
    }

    /// Format seconds as an SRT timestamp (HH:MM:SS,mmm)
    pub fn format_timestamp(seconds: f64) -> String {
        let ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let secs = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} [{:.2} - {:.2}] ({}) {}", self.index, self.start, self.end, self.origin, self.text)
    }
}

fn check_seconds(value: f64, field: &'static str) -> Result<f64, SubtitleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SubtitleError::InvalidTiming { field, value: value.to_string() })
    }
}

fn parse_seconds(raw: &str, field: &'static str) -> Result<f64, SubtitleError> {
    let value: f64 = raw.parse().map_err(|_| SubtitleError::InvalidTiming {
        field,
        value: raw.to_string(),
    })?;
    check_seconds(value, field).map_err(|_| SubtitleError::InvalidTiming {
        field,
        value: raw.to_string(),
    })
}

fn parse_index(raw: &str) -> Result<usize, SubtitleError> {
    match raw.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(SubtitleError::InvalidIndex(raw.to_string())),
    }
}

/// Escape backslashes and line breaks so an entry fits on one delimited line
pub fn escape_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.replace("\r\n", "\n").chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_line_breaks`]
///
/// Only `\\` and `\n` are decoded; any other backslash sequence is kept as written.
pub fn unescape_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Input representation of a subtitle track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// Pipe-delimited lines: `[index |] start | end | text`
    Delimited,
    /// JSON array of records with `start`, `end`, `text` and optional `index`
    Json,
    /// SubRip blocks
    Srt,
}

impl SubtitleFormat {
    /// Guess the format from a file extension, defaulting to delimited text
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("srt") => Self::Srt,
            _ => Self::Delimited,
        }
    }
}

/// A record that was skipped while reading a track
#[derive(Debug, Clone, PartialEq)]
pub struct ParseDiagnostic {
    /// 1-based line number (delimited, SRT) or record position (JSON)
    pub location: usize,
    /// Why the record was skipped
    pub error: SubtitleError,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.location, self.error)
    }
}

/// Entries read from one origin together with the records that were skipped
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Origin every entry is tagged with
    pub origin: Origin,
    /// Parsed entries in input order
    pub entries: Vec<SubtitleEntry>,
    /// Skipped records
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl LoadOutcome {
    /// An outcome with no entries and no diagnostics
    pub fn empty(origin: Origin) -> Self {
        LoadOutcome {
            origin,
            entries: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Shift every entry by `offset` seconds
    pub fn with_offset(self, offset: f64) -> Self {
        if offset == 0.0 {
            return self;
        }
        let entries = self.entries.iter().map(|e| e.shifted(offset)).collect();
        LoadOutcome { entries, ..self }
    }

    fn skip(&mut self, location: usize, error: SubtitleError) {
        warn!("{} track, line {}: skipped ({})", self.origin, location, error);
        self.diagnostics.push(ParseDiagnostic { location, error });
    }
}

// Shape of one structured record
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    index: Option<usize>,
    start: f64,
    end: f64,
    text: String,
}

/// Adapter turning raw track representations into [`SubtitleEntry`] sequences
pub struct SubtitleSource;

impl SubtitleSource {
    /// Parse content in the given format
    pub fn parse(content: &str, format: SubtitleFormat, origin: Origin) -> LoadOutcome {
        match format {
            SubtitleFormat::Delimited => Self::parse_delimited(content, origin),
            SubtitleFormat::Json => Self::parse_json(content, origin),
            SubtitleFormat::Srt => Self::parse_srt(content, origin),
        }
    }

    /// Read a track from disk, detecting the format from the extension
    ///
    /// A missing file is not an error: it yields an empty outcome.
    pub fn load<P: AsRef<Path>>(path: P, origin: Origin) -> Result<LoadOutcome> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            warn!("{} track not found: {:?}", origin, path);
            return Ok(LoadOutcome::empty(origin));
        }

        let content = FileManager::read_to_string(path)?;
        let format = FileManager::detect_format(path);
        let outcome = Self::parse(&content, format, origin);
        info!("Loaded {} {} entries from {:?} ({} skipped)",
              outcome.len(), origin, path, outcome.diagnostics.len());
        Ok(outcome)
    }

    /// Parse pipe-delimited lines
    ///
    /// Blank lines and lines starting with `#` are ignored. Machine lines may
    /// be `start | end | text` or `index | start | end | text`; human lines
    /// must carry the index. Everything after the last timing field is text.
    pub fn parse_delimited(content: &str, origin: Origin) -> LoadOutcome {
        let mut outcome = LoadOutcome::empty(origin);

        for (line_idx, line) in content.lines().enumerate() {
            let line_num = line_idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let next_index = outcome.entries.len() + 1;
            match Self::parse_delimited_line(trimmed, origin, next_index) {
                Ok(entry) => outcome.entries.push(entry),
                Err(e) => outcome.skip(line_num, e),
            }
        }

        outcome
    }

    fn parse_delimited_line(line: &str, origin: Origin, next_index: usize) -> Result<SubtitleEntry, SubtitleError> {
        let found = line.split('|').count();
        if found < origin.min_fields() {
            return Err(SubtitleError::WrongFieldCount { expected: origin.min_fields(), found });
        }

        let indexed: Vec<&str> = line.splitn(4, '|').map(str::trim).collect();
        let has_index = match origin {
            Origin::Human => true,
            Origin::Machine => {
                indexed.len() == 4
                    && parse_index(indexed[0]).is_ok()
                    && parse_seconds(indexed[1], "start").is_ok()
                    && parse_seconds(indexed[2], "end").is_ok()
            }
        };

        let (index, start, end, text) = if has_index {
            (parse_index(indexed[0])?, indexed[1], indexed[2], indexed[3])
        } else {
            let fields: Vec<&str> = line.splitn(3, '|').map(str::trim).collect();
            (next_index, fields[0], fields[1], fields[2])
        };

        let start = parse_seconds(start, "start")?;
        let end = parse_seconds(end, "end")?;
        SubtitleEntry::new_validated(index, start, end, &unescape_line_breaks(text), origin)
    }

    /// Parse a JSON document holding an array of records
    pub fn parse_json(content: &str, origin: Origin) -> LoadOutcome {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(records)) => Self::parse_records(&records, origin),
            Ok(_) => {
                let mut outcome = LoadOutcome::empty(origin);
                outcome.skip(1, SubtitleError::InvalidRecord("top-level value is not an array".to_string()));
                outcome
            }
            Err(e) => {
                let mut outcome = LoadOutcome::empty(origin);
                outcome.skip(e.line().max(1), SubtitleError::InvalidRecord(e.to_string()));
                outcome
            }
        }
    }

    /// Parse a collection of key/value records
    ///
    /// Records without an `index` are numbered by their position.
    pub fn parse_records(records: &[Value], origin: Origin) -> LoadOutcome {
        let mut outcome = LoadOutcome::empty(origin);

        for (pos, record) in records.iter().enumerate() {
            let location = pos + 1;
            let entry = serde_json::from_value::<RawRecord>(record.clone())
                .map_err(|e| SubtitleError::InvalidRecord(e.to_string()))
                .and_then(|raw| {
                    let index = raw.index.unwrap_or(outcome.entries.len() + 1);
                    SubtitleEntry::new_validated(index, raw.start, raw.end, &raw.text, origin)
                });

            match entry {
                Ok(entry) => outcome.entries.push(entry),
                Err(e) => outcome.skip(location, e),
            }
        }

        outcome
    }

    /// Parse SubRip content
    pub fn parse_srt(content: &str, origin: Origin) -> LoadOutcome {
        let mut outcome = LoadOutcome::empty(origin);

        // (first line number, lines) for every blank-line separated block
        let mut blocks: Vec<(usize, Vec<&str>)> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut block_start = 0;
        for (line_idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !current.is_empty() {
                    blocks.push((block_start, std::mem::take(&mut current)));
                }
                continue;
            }
            if current.is_empty() {
                block_start = line_idx + 1;
            }
            current.push(trimmed);
        }
        if !current.is_empty() {
            blocks.push((block_start, current));
        }

        for (line_num, lines) in blocks {
            match Self::parse_srt_block(&lines, origin) {
                Ok(entry) => outcome.entries.push(entry),
                Err(e) => outcome.skip(line_num, e),
            }
        }

        outcome
    }

    fn parse_srt_block(lines: &[&str], origin: Origin) -> Result<SubtitleEntry, SubtitleError> {
        if lines.len() < 3 {
            return Err(SubtitleError::WrongFieldCount { expected: 3, found: lines.len() });
        }

        let index = parse_index(lines[0])?;
        let caps = TIMESTAMP_REGEX.captures(lines[1]).ok_or_else(|| SubtitleError::InvalidTiming {
            field: "start",
            value: lines[1].to_string(),
        })?;

        let start = Self::srt_seconds(&caps[1], "start")?;
        let end = Self::srt_seconds(&caps[2], "end")?;
        SubtitleEntry::new_validated(index, start, end, &lines[2..].join("\n"), origin)
    }

    fn srt_seconds(raw: &str, field: &'static str) -> Result<f64, SubtitleError> {
        SubtitleEntry::parse_timestamp(raw).map_err(|_| SubtitleError::InvalidTiming {
            field,
            value: raw.to_string(),
        })
    }
}
