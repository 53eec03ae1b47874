// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use submerge::app_config::{self, Config};
use submerge::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge a machine-transcribed track with a human-authored track
    Merge(MergeArgs),

    /// Generate shell completions for submerge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Machine-transcribed subtitle file (.txt, .json or .srt)
    #[arg(short = 'w', long, value_name = "FILE", default_value = "whisper_subtitles.txt")]
    machine: PathBuf,

    /// Human-authored subtitle file (.txt, .json or .srt)
    #[arg(short = 'u', long, value_name = "FILE", default_value = "manual_subtitles.txt")]
    human: PathBuf,

    /// Directory the merged files are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Keep the machine text for matched pairs
    #[arg(long)]
    prefer_machine_text: bool,

    /// Keep the human timing for matched pairs
    #[arg(long)]
    prefer_human_timing: bool,

    /// Minimum combined score to accept a pairing (0.0 to 1.0)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Also write the merged track as SRT
    #[arg(long)]
    srt: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// submerge - merge machine-transcribed and human-authored subtitles
#[derive(Parser, Debug)]
#[command(name = "submerge")]
#[command(version)]
#[command(about = "Merge speech-recognition subtitles with manual subtitles")]
#[command(long_about = "submerge pairs a machine-transcribed subtitle track with a human-authored one,
keeps the human text and the machine timing (configurable), and writes the merged
track together with an audit report.

EXAMPLES:
    submerge merge -w whisper.txt -u manual.txt           # Merge with default policy
    submerge merge -w whisper.json -u manual.srt -o out/  # Mixed input formats
    submerge merge --prefer-human-timing -t 0.7 -f        # Custom policy, overwrite outputs
    submerge completions bash > submerge.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, emoji) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Accept everything here; the effective level is set after config loading
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "submerge", &mut std::io::stdout());
            Ok(())
        }
        Commands::Merge(args) => {
            if let Err(e) = run_merge(args) {
                error!("{:#}", e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn run_merge(options: MergeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&level));
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if options.prefer_machine_text {
        config.merge.prefer_human_text = false;
    }
    if options.prefer_human_timing {
        config.merge.prefer_machine_timing = false;
    }
    if let Some(threshold) = options.threshold {
        config.merge.acceptance_threshold = threshold;
    }
    if options.srt {
        config.output.write_srt = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;

    info!("Merging {:?} (machine) with {:?} (human)", options.machine, options.human);
    controller.run(&options.machine, &options.human, &options.output_dir, options.force_overwrite)?;

    Ok(())
}
