//! # Marker Library
//!
//! Core logic for automated marking of programming assignment submissions.
//! It defines the calendar and mark value types, the rubric-based scoring
//! engine, the per-assignment submission registry with its admission rules,
//! and the resolution boundary through which rubrics, due dates and test
//! inputs are looked up.
//!
//! ## Key Concepts
//! - **Rubric**: ordered (pattern, weight) pairs; a submission earns each
//!   weight whose pattern appears in its captured output.
//! - **Assignment**: owns a bounded set of submissions and enforces the
//!   late/duplicate/capacity admission checks.
//! - **ConfigSource**: pluggable lookup for assignment, rubric and
//!   test-input records; a failed lookup is an explicit error, never an
//!   empty rubric.

pub mod assignment;
pub mod date;
pub mod error;
pub mod mark;
pub mod resolve;
pub mod rubric;
pub mod submission;

pub use assignment::{Assignment, Rejection};
pub use date::Date;
pub use error::MarkerError;
pub use mark::Mark;
pub use resolve::{AssignmentRecord, ConfigSource, JsonConfigSource, RubricRecord};
pub use rubric::{Rubric, RubricItem, RubricSource};
pub use submission::Submission;
