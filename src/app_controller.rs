use anyhow::{Result, Context};
use log::{warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::merge::{MergeOutcome, SubtitleMerger};
use crate::subtitle_processor::{LoadOutcome, Origin, SubtitleSource};

// @module: Application controller for subtitle merging

/// Main application controller: load both tracks, merge, write the results
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Merge engine built from the configuration
    merger: SubtitleMerger,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let merger = SubtitleMerger::from_config(&config.merge)?;

        Ok(Self { config, merger })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load one track, applying the machine offset to machine entries
    pub fn load_track<P: AsRef<Path>>(&self, path: P, origin: Origin) -> Result<LoadOutcome> {
        let outcome = SubtitleSource::load(path, origin)?;
        match origin {
            Origin::Machine => Ok(outcome.with_offset(self.config.input.machine_offset_secs)),
            Origin::Human => Ok(outcome),
        }
    }

    /// Load and merge two tracks without writing anything
    pub fn merge_files<P1: AsRef<Path>, P2: AsRef<Path>>(&self, machine_path: P1, human_path: P2) -> Result<MergeOutcome> {
        let machine = self.load_track(machine_path, Origin::Machine)?;
        let human = self.load_track(human_path, Origin::Human)?;

        let outcome = self.merger.merge(&machine.entries, &human.entries)?;
        Ok(outcome)
    }

    /// Paths of every artifact the current configuration writes
    pub fn output_paths<P: AsRef<Path>>(&self, output_dir: P) -> Vec<PathBuf> {
        let output = &self.config.output;
        let dir = output_dir.as_ref();

        let mut paths = vec![FileManager::generate_output_path(dir, &output.basename, "txt")];
        if output.write_json {
            paths.push(FileManager::generate_output_path(dir, &output.basename, "json"));
        }
        if output.write_srt {
            paths.push(FileManager::generate_output_path(dir, &output.basename, "srt"));
        }
        if output.write_report {
            paths.push(FileManager::generate_output_path(dir, &output.report_name, "txt"));
        }
        paths
    }

    /// Run the main workflow: merge both tracks and write every artifact
    ///
    /// Returns the merge outcome, or `None` when existing outputs were kept.
    pub fn run<P1, P2, P3>(&self, machine_path: P1, human_path: P2, output_dir: P3, force_overwrite: bool) -> Result<Option<MergeOutcome>>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
        P3: AsRef<Path>,
    {
        let start_time = Instant::now();
        let output_dir = output_dir.as_ref();

        let existing: Vec<PathBuf> = self.output_paths(output_dir)
            .into_iter()
            .filter(|p| FileManager::file_exists(p))
            .collect();
        if !existing.is_empty() && !force_overwrite {
            warn!("Skipping merge, output already exists (use -f to force overwrite): {:?}", existing);
            return Ok(None);
        }

        info!(
            "Strategy: human text={}, machine timing={}",
            if self.config.merge.prefer_human_text { "YES" } else { "NO" },
            if self.config.merge.prefer_machine_timing { "YES" } else { "NO" }
        );

        let outcome = self.merge_files(machine_path, human_path)?;

        FileManager::ensure_dir(output_dir)?;
        self.write_outputs(&outcome, output_dir)?;

        info!("Merge completed in {}.", Self::format_duration(start_time.elapsed()));
        Ok(Some(outcome))
    }

    fn write_outputs(&self, outcome: &MergeOutcome, output_dir: &Path) -> Result<()> {
        let output = &self.config.output;

        let track_path = FileManager::generate_output_path(output_dir, &output.basename, "txt");
        FileManager::write_to_file(&track_path, &outcome.to_delimited_string())?;
        info!("Saved: {:?}", track_path);

        if output.write_json {
            let path = FileManager::generate_output_path(output_dir, &output.basename, "json");
            FileManager::write_to_file(&path, &outcome.to_json_string()?)?;
            debug!("Saved: {:?}", path);
        }

        if output.write_srt {
            let path = FileManager::generate_output_path(output_dir, &output.basename, "srt");
            FileManager::write_to_file(&path, &outcome.to_srt_string())?;
            debug!("Saved: {:?}", path);
        }

        if output.write_report {
            let path = FileManager::generate_output_path(output_dir, &output.report_name, "txt");
            FileManager::write_to_file(&path, &outcome.report().to_string())?;
            info!("Report saved: {:?}", path);
        }

        Ok(())
    }

    /// Format a duration as a short human-readable string
    pub fn format_duration(duration: Duration) -> String {
        let total_ms = duration.as_millis();
        if total_ms < 1000 {
            return format!("{}ms", total_ms);
        }
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            format!("{}m {}s", secs / 60, secs % 60)
        }
    }
}
