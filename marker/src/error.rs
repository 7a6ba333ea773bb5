//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, which covers every failure
//! that can occur while loading grading configuration, resolving rubrics, or
//! constructing the data model. Admission rejections are deliberately not
//! errors; see [`crate::assignment::Rejection`].

use std::fmt;

/// Represents all error types that can occur in the marker system.
#[derive(Debug)]
pub enum MarkerError {
    /// Rubric pattern and weight lists do not match in length, or a weight
    /// is negative.
    RubricMismatch(String),
    /// A configuration record is malformed or does not match the expected
    /// schema.
    InvalidConfig(String),
    /// A rubric, assignment, or test-input lookup failed to resolve. Must
    /// be surfaced to the caller; substituting an empty rubric would mask a
    /// configuration bug as a valid zero grade.
    LookupNotFound(String),
    /// A date string is not zero-padded `YYYY-MM-DD` or has an
    /// out-of-range component.
    InvalidDate(String),
    /// I/O error (file not found, unreadable, etc.).
    IoError(String),
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerError::RubricMismatch(msg) => write!(f, "rubric mismatch: {}", msg),
            MarkerError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            MarkerError::LookupNotFound(msg) => write!(f, "lookup failed: {}", msg),
            MarkerError::InvalidDate(msg) => write!(f, "invalid date: {}", msg),
            MarkerError::IoError(msg) => write!(f, "io error: {}", msg),
        }
    }
}

impl std::error::Error for MarkerError {}
