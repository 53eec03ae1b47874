/*!
 * Error types for the submerge application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading a single subtitle record
///
/// These never abort a whole read: the adapter collects them as
/// diagnostics and keeps going with the next line or record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// The line does not carry enough pipe-separated fields
    #[error("Expected at least {expected} fields, found {found}")]
    WrongFieldCount {
        /// Minimum number of fields for this origin
        expected: usize,
        /// Number of fields actually present
        found: usize,
    },

    /// A timing field is not a usable number of seconds
    #[error("Invalid {field} time: '{value}'")]
    InvalidTiming {
        /// Which timing field failed ("start" or "end")
        field: &'static str,
        /// Raw value that failed to parse
        value: String,
    },

    /// The index field is not a positive integer
    #[error("Invalid index: '{0}'")]
    InvalidIndex(String),

    /// The text field is empty after trimming
    #[error("Empty subtitle text")]
    EmptyText,

    /// A structured record could not be decoded
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Errors that can occur when running a merge
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    /// Both origins yielded zero entries
    #[error("Nothing to merge: both machine and human tracks are empty")]
    NothingToMerge,

    /// The scoring or resolution policy is not usable
    #[error("Invalid merge policy: {0}")]
    InvalidPolicy(String),
}
