//! The mark value type: points awarded out of points possible.

use std::fmt;

/// A score and its maximum, copied by value into each submission.
///
/// A valid set requires `score <= out_of` and `out_of > 0`. The one
/// exception is the degenerate `(0, 0)` mark produced by grading with an
/// empty rubric; it means "no rubric available" and must never be presented
/// as a passing score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    score: u32,
    out_of: u32,
}

impl Mark {
    /// Creates a mark, rejecting any pair that violates the invariant.
    pub fn new(score: u32, out_of: u32) -> Option<Self> {
        if out_of == 0 || score > out_of {
            return None;
        }
        Some(Mark { score, out_of })
    }

    /// The placeholder mark given to a submission before grading runs.
    pub fn ungraded() -> Self {
        Mark {
            score: 0,
            out_of: 100,
        }
    }

    /// Unchecked constructor for the scoring engine, which may legitimately
    /// produce the degenerate `(0, 0)` mark from an empty rubric.
    pub(crate) fn raw(score: u32, out_of: u32) -> Self {
        Mark { score, out_of }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn out_of(&self) -> u32 {
        self.out_of
    }

    /// True when this mark came from an empty rubric and carries no grading
    /// information.
    pub fn is_degenerate(&self) -> bool {
        self.out_of == 0
    }
}

impl Default for Mark {
    fn default() -> Self {
        Mark::ungraded()
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.out_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enforces_invariant() {
        assert!(Mark::new(50, 100).is_some());
        assert!(Mark::new(100, 100).is_some());
        assert!(Mark::new(0, 1).is_some());
        assert!(Mark::new(101, 100).is_none());
        assert!(Mark::new(0, 0).is_none());
    }

    #[test]
    fn test_ungraded_placeholder() {
        let m = Mark::default();
        assert_eq!(m.score(), 0);
        assert_eq!(m.out_of(), 100);
        assert!(!m.is_degenerate());
    }

    #[test]
    fn test_degenerate_mark_is_flagged() {
        let m = Mark::raw(0, 0);
        assert!(m.is_degenerate());
        assert!(!Mark::raw(50, 100).is_degenerate());
    }

    #[test]
    fn test_display() {
        assert_eq!(Mark::raw(75, 100).to_string(), "75/100");
    }
}
