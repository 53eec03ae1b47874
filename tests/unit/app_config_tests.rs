/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use submerge::app_config::{Config, LogLevel, MergeConfig};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.merge.prefer_human_text);
    assert!(config.merge.prefer_machine_timing);
    assert_eq!(config.merge.text_weight, 0.7);
    assert_eq!(config.merge.time_weight, 0.3);
    assert_eq!(config.merge.time_window_secs, 5.0);
    assert_eq!(config.merge.acceptance_threshold, 0.6);
    assert_eq!(config.merge.perfect_match_threshold, 0.9);
    assert_eq!(config.input.machine_offset_secs, 0.0);
    assert_eq!(config.output.basename, "final_subtitles");
    assert_eq!(config.output.report_name, "merge_report");
    assert!(config.output.write_json);
    assert!(config.output.write_report);
    assert!(!config.output.write_srt);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.merge.text_weight = 0.8;
    assert!(config.validate().is_err());
    config.merge.time_weight = 0.2;
    assert!(config.validate().is_ok());

    config.merge.time_window_secs = 0.0;
    assert!(config.validate().is_err());
    config.merge.time_window_secs = 3.0;

    config.merge.acceptance_threshold = -0.1;
    assert!(config.validate().is_err());
    config.merge.acceptance_threshold = 0.6;

    config.merge.perfect_match_threshold = 1.1;
    assert!(config.validate().is_err());
    config.merge.perfect_match_threshold = 0.9;

    config.input.machine_offset_secs = f64::NAN;
    assert!(config.validate().is_err());
    config.input.machine_offset_secs = 1.0;

    config.output.basename = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withReportNameEqualToBasename_shouldFail() {
    let mut config = Config::default();
    config.output.report_name = config.output.basename.clone();
    assert!(config.validate().is_err());

    config.output.report_name = "audit".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withBadWeights_shouldReportMergePolicy() {
    let mut config = Config::default();
    config.merge.time_weight = 0.5;

    let message = format!("{:#}", config.validate().unwrap_err());
    assert!(message.contains("Invalid merge settings"));
    assert!(message.contains("weights must sum to 1.0"));
}

/// Test that partial JSON falls back to defaults for missing fields
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{
        "merge": { "prefer_human_text": false, "acceptance_threshold": 0.75 },
        "log_level": "debug"
    }"#)?;

    assert!(!config.merge.prefer_human_text);
    assert!(config.merge.prefer_machine_timing);
    assert_eq!(config.merge.acceptance_threshold, 0.75);
    assert_eq!(config.merge, MergeConfig { prefer_human_text: false, acceptance_threshold: 0.75, ..MergeConfig::default() });
    assert_eq!(config.output.basename, "final_subtitles");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert_eq!(config, Config::default());
    assert!(path.exists());

    let reloaded = Config::from_file(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}
