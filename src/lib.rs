/*!
 * # submerge - merge machine-transcribed and human-authored subtitles
 *
 * A Rust library that reconciles two subtitle tracks for the same media file:
 * one produced by speech recognition (noisy text, reliable timing) and one
 * written or corrected by a person (reliable text, approximate timing).
 *
 * ## Features
 *
 * - Read tracks from pipe-delimited text, JSON records or SRT
 * - Pair entries by text similarity and start-time proximity
 * - Choose which side contributes text and which contributes timing
 * - Write the merged track as delimited text, JSON or SRT
 * - Audit report with per-entry scores and both candidate texts
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Reading tracks into canonical entries
 * - `merge`: The merge engine:
 *   - `merge::scoring`: Text and time scoring
 *   - `merge::matcher`: Greedy one-to-one matching
 *   - `merge::resolver`: Text/timing policy and re-sequencing
 *   - `merge::report`: Audit report
 *   - `merge::export`: Output renderings
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod merge;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{LoadOutcome, Origin, SubtitleEntry, SubtitleSource};
pub use merge::{MergeOutcome, MergedEntry, Provenance, SubtitleMerger};
pub use errors::{MergeError, SubtitleError};
