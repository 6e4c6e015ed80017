//! Error types for act-set ingestion.

use thiserror::Error;

/// The only failures the scoring core can surface.
///
/// Both are raised at the record boundary, while turning an extractor's raw
/// output into [`Act`](crate::act::Act)s. They indicate a caller bug (a
/// record that is missing data outright), never a transient condition.
/// Unrecognized labels are not errors: they fall back to documented
/// defaults.
#[derive(Debug, Error, PartialEq)]
pub enum IapError {
    #[error("act record is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("act record field '{field}' has an unusable value: {value}")]
    InvalidField { field: &'static str, value: String },
}
