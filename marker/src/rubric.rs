//! Rubric construction and the substring-match scoring engine.
//!
//! A rubric is an ordered list of (pattern, weight) pairs. Grading awards
//! each weight whose pattern appears anywhere in the captured output, and
//! the maximum is always the sum of all weights. Example: a rubric with
//! "Hello World" worth 50 and "Goodbye World" worth 50 grades output
//! containing both strings as 100/100, one of them as 50/100, neither as
//! 0/100.

use crate::error::MarkerError;
use crate::mark::Mark;
use crate::resolve::ConfigSource;

/// Upper bound on rubric items; excess items are truncated with a warning.
pub const MAX_RUBRIC_ITEMS: usize = 50;

/// One scoreable pattern and the points it is worth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubricItem {
    pub pattern: String,
    pub weight: u32,
}

/// An ordered, bounded list of [`RubricItem`]s owned by one assignment.
#[derive(Debug, Clone, Default)]
pub struct Rubric {
    items: Vec<RubricItem>,
}

impl Rubric {
    /// Builds a rubric from parallel pattern and weight lists.
    ///
    /// Mismatched lengths are a construction error, rejected outright
    /// rather than truncated to the shorter list. More than
    /// [`MAX_RUBRIC_ITEMS`] entries are truncated, and the truncation is
    /// logged so it cannot pass silently. A weight sum beyond `u32::MAX`
    /// is rejected here so grading can never overflow the maximum.
    pub fn new(patterns: Vec<String>, weights: Vec<u32>) -> Result<Self, MarkerError> {
        if patterns.len() != weights.len() {
            return Err(MarkerError::RubricMismatch(format!(
                "{} patterns but {} weights",
                patterns.len(),
                weights.len()
            )));
        }

        let mut items: Vec<RubricItem> = patterns
            .into_iter()
            .zip(weights)
            .map(|(pattern, weight)| RubricItem { pattern, weight })
            .collect();

        if items.len() > MAX_RUBRIC_ITEMS {
            log::warn!(
                "rubric has {} items, truncating to {}",
                items.len(),
                MAX_RUBRIC_ITEMS
            );
            items.truncate(MAX_RUBRIC_ITEMS);
        }

        let weight_sum: u64 = items.iter().map(|item| u64::from(item.weight)).sum();
        if weight_sum > u64::from(u32::MAX) {
            return Err(MarkerError::RubricMismatch(format!(
                "weight sum {} exceeds the representable maximum",
                weight_sum
            )));
        }

        Ok(Rubric { items })
    }

    pub fn items(&self) -> &[RubricItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Grades captured output against this rubric.
    ///
    /// Each item's weight is awarded iff its pattern occurs as a
    /// case-sensitive substring of `output`; repeated occurrences count
    /// once. The maximum is the sum of all weights regardless of matches,
    /// so the result depends only on the rubric and the text — grading is
    /// pure and idempotent. An empty rubric yields the degenerate `0/0`
    /// mark, which callers must treat as "no rubric available".
    pub fn grade(&self, output: &str) -> Mark {
        let mut score = 0;
        let mut out_of = 0;

        for item in &self.items {
            out_of += item.weight;
            if output.contains(&item.pattern) {
                score += item.weight;
            }
        }

        Mark::raw(score, out_of)
    }
}

/// The two ways a rubric comes into existence: literal inline items, or a
/// named reference resolved through a [`ConfigSource`].
#[derive(Debug, Clone)]
pub enum RubricSource {
    Inline {
        patterns: Vec<String>,
        weights: Vec<u32>,
    },
    ByReference(String),
}

impl RubricSource {
    /// Materializes the rubric.
    ///
    /// A by-reference name that fails to resolve propagates
    /// [`MarkerError::LookupNotFound`]; it is never replaced by an empty
    /// rubric, which would grade as 0/0 and mask the configuration bug.
    pub fn build(self, source: &dyn ConfigSource) -> Result<Rubric, MarkerError> {
        match self {
            RubricSource::Inline { patterns, weights } => Rubric::new(patterns, weights),
            RubricSource::ByReference(name) => source.resolve_rubric(&name)?.into_rubric(),
        }
    }
}
