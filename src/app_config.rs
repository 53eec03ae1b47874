use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use log::warn;
use crate::merge::SubtitleMerger;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Matching and resolution policy
    #[serde(default)]
    pub merge: MergeConfig,

    /// Input adjustments
    #[serde(default)]
    pub input: InputConfig,

    /// Output file selection
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Merge engine settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MergeConfig {
    /// Use the human text for matched pairs (machine text otherwise)
    #[serde(default = "default_true")]
    pub prefer_human_text: bool,

    /// Use the machine timing for matched pairs (human timing otherwise)
    #[serde(default = "default_true")]
    pub prefer_machine_timing: bool,

    /// Weight of text similarity in the combined score
    #[serde(default = "default_text_weight")]
    pub text_weight: f64,

    /// Weight of start-time proximity in the combined score
    #[serde(default = "default_time_weight")]
    pub time_weight: f64,

    /// Start-time distance in seconds beyond which proximity counts for nothing
    #[serde(default = "default_time_window_secs")]
    pub time_window_secs: f64,

    /// Minimum combined score to accept a pairing (0.0 to 1.0)
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,

    /// Scores above this are reported as perfect matches
    #[serde(default = "default_perfect_match_threshold")]
    pub perfect_match_threshold: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            prefer_human_text: true,
            prefer_machine_timing: true,
            text_weight: default_text_weight(),
            time_weight: default_time_weight(),
            time_window_secs: default_time_window_secs(),
            acceptance_threshold: default_acceptance_threshold(),
            perfect_match_threshold: default_perfect_match_threshold(),
        }
    }
}

/// Input settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct InputConfig {
    /// Seconds added to every machine entry when it is loaded
    ///
    /// Compensates a constant delay between the transcription and the video.
    #[serde(default)]
    pub machine_offset_secs: f64,
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// File stem of the merged track files
    #[serde(default = "default_basename")]
    pub basename: String,

    /// File stem of the audit report
    #[serde(default = "default_report_name")]
    pub report_name: String,

    #[serde(default = "default_true")]
    pub write_json: bool,

    #[serde(default = "default_true")]
    pub write_report: bool,

    #[serde(default)]
    pub write_srt: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            basename: default_basename(),
            report_name: default_report_name(),
            write_json: true,
            write_report: true,
            write_srt: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_text_weight() -> f64 {
    0.7
}

fn default_time_weight() -> f64 {
    0.3
}

fn default_time_window_secs() -> f64 {
    5.0
}

fn default_acceptance_threshold() -> f64 {
    0.6
}

fn default_perfect_match_threshold() -> f64 {
    0.9
}

fn default_basename() -> String {
    "final_subtitles".to_string()
}

fn default_report_name() -> String {
    "merge_report".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration, writing a default file first if none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        SubtitleMerger::from_config(&self.merge).context("Invalid merge settings")?;

        if !self.input.machine_offset_secs.is_finite() {
            return Err(anyhow!("machine_offset_secs must be a finite number"));
        }
        if self.output.basename.trim().is_empty() {
            return Err(anyhow!("Output basename must not be empty"));
        }
        if self.output.report_name.trim().is_empty() {
            return Err(anyhow!("Report name must not be empty"));
        }
        // Both are written as .txt into the same directory
        if self.output.report_name == self.output.basename {
            return Err(anyhow!(
                "Report name must differ from the output basename ('{}')",
                self.output.basename
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            merge: MergeConfig::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
