//! An assignment with its rubric, due date, and bounded submission registry.
//!
//! All submissions enter through [`Assignment::add_submission`], which
//! enforces the capacity, late, and duplicate checks in that order. Grading
//! never happens at admission time; [`Assignment::grade_all_submissions`]
//! recomputes every mark from stored output in one pass.

use crate::date::Date;
use crate::rubric::Rubric;
use crate::submission::Submission;
use std::fmt;

/// Default upper bound on submissions per assignment.
pub const MAX_SUBMISSIONS: usize = 100;

/// Why an admission attempt was refused. A value, not an error: the caller
/// decides how to surface it, and no submission is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The submission registry is already at capacity.
    Capacity,
    /// Submitted strictly after the due date.
    Late,
    /// A submission with the same (student, date) identity already exists.
    Duplicate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Capacity => write!(f, "submission capacity reached"),
            Rejection::Late => write!(f, "submitted after the due date"),
            Rejection::Duplicate => write!(f, "duplicate submission"),
        }
    }
}

#[derive(Debug)]
pub struct Assignment {
    name: String,
    description: String,
    due_date: Date,
    rubric: Rubric,
    submissions: Vec<Submission>,
    capacity: usize,
}

impl Assignment {
    pub fn new(name: &str, description: &str, due_date: Date, rubric: Rubric) -> Self {
        Self::with_capacity(name, description, due_date, rubric, MAX_SUBMISSIONS)
    }

    pub fn with_capacity(
        name: &str,
        description: &str,
        due_date: Date,
        rubric: Rubric,
        capacity: usize,
    ) -> Self {
        Assignment {
            name: name.to_string(),
            description: description.to_string(),
            due_date,
            rubric,
            submissions: Vec::new(),
            capacity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> Date {
        self.due_date
    }

    pub fn update_due_date(&mut self, due_date: Date) {
        self.due_date = due_date;
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Attempts to record a submission, checking capacity, lateness, and
    /// duplicate identity in that precedence order.
    ///
    /// On success the submission is stored with the ungraded placeholder
    /// mark; no scoring happens here.
    pub fn add_submission(
        &mut self,
        student_id: u32,
        output: String,
        submitted_at: Date,
    ) -> Result<(), Rejection> {
        if self.submissions.len() >= self.capacity {
            return Err(Rejection::Capacity);
        }

        if self.due_date < submitted_at {
            return Err(Rejection::Late);
        }

        if self
            .submissions
            .iter()
            .any(|s| s.matches(student_id, submitted_at))
        {
            return Err(Rejection::Duplicate);
        }

        self.submissions.push(Submission::new(
            student_id,
            self.name.clone(),
            output,
            submitted_at,
        ));

        Ok(())
    }

    /// Removes the submission with the given identity key, returning
    /// whether one was found.
    ///
    /// Removal does not preserve the relative order of the remaining
    /// submissions; no iteration order may be assumed afterwards.
    pub fn remove_submission(&mut self, student_id: u32, submitted_at: Date) -> bool {
        match self
            .submissions
            .iter()
            .position(|s| s.matches(student_id, submitted_at))
        {
            Some(index) => {
                self.submissions.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Recomputes every stored submission's mark from its current output.
    ///
    /// A full recompute each call, not an incremental update: grading twice
    /// with unchanged rubric and output yields identical marks.
    pub fn grade_all_submissions(&mut self) {
        if self.rubric.is_empty() && !self.submissions.is_empty() {
            log::warn!(
                "assignment '{}' has no rubric available; submissions grade as 0/0",
                self.name
            );
        }

        let rubric = &self.rubric;
        for submission in &mut self.submissions {
            let mark = rubric.grade(submission.output());
            submission.set_mark(mark);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::Rubric;

    fn assignment() -> Assignment {
        let rubric = Rubric::new(vec!["Hello Frodo!".into()], vec![100]).unwrap();
        Assignment::new(
            "A1",
            "First assignment",
            Date::new(2025, 10, 15),
            rubric,
        )
    }

    #[test]
    fn test_on_time_submission_accepted() {
        let mut a = assignment();
        assert!(a
            .add_submission(123456, "Hello Frodo!\n".into(), Date::new(2025, 10, 14))
            .is_ok());
        assert_eq!(a.submissions().len(), 1);
        assert_eq!(a.submissions()[0].mark(), crate::Mark::ungraded());
    }

    #[test]
    fn test_late_submission_rejected() {
        let mut a = assignment();
        let result = a.add_submission(123456, "out".into(), Date::new(2025, 10, 16));
        assert_eq!(result, Err(Rejection::Late));
        assert!(a.submissions().is_empty());
    }

    #[test]
    fn test_due_date_itself_is_on_time() {
        let mut a = assignment();
        assert!(a
            .add_submission(123456, "out".into(), Date::new(2025, 10, 15))
            .is_ok());
    }

    #[test]
    fn test_duplicate_rejected_first_unaffected() {
        let mut a = assignment();
        let date = Date::new(2025, 10, 14);
        a.add_submission(123456, "first".into(), date).unwrap();
        let second = a.add_submission(123456, "second".into(), date);
        assert_eq!(second, Err(Rejection::Duplicate));
        assert_eq!(a.submissions().len(), 1);
        assert_eq!(a.submissions()[0].output(), "first");
    }

    #[test]
    fn test_same_student_different_dates_allowed() {
        let mut a = assignment();
        a.add_submission(123456, "one".into(), Date::new(2025, 10, 13))
            .unwrap();
        assert!(a
            .add_submission(123456, "two".into(), Date::new(2025, 10, 14))
            .is_ok());
    }

    #[test]
    fn test_capacity_rejection_takes_precedence() {
        let rubric = Rubric::new(vec![], vec![]).unwrap();
        let mut a =
            Assignment::with_capacity("A1", "", Date::new(2025, 10, 15), rubric, 1);
        a.add_submission(1, "out".into(), Date::new(2025, 10, 14))
            .unwrap();
        // Duplicate also holds, but capacity is checked first.
        let result = a.add_submission(1, "out".into(), Date::new(2025, 10, 14));
        assert_eq!(result, Err(Rejection::Capacity));
    }

    #[test]
    fn test_remove_then_readd_succeeds() {
        let mut a = assignment();
        let date = Date::new(2025, 10, 14);
        a.add_submission(123456, "first".into(), date).unwrap();
        assert!(a.remove_submission(123456, date));
        assert!(a.add_submission(123456, "again".into(), date).is_ok());
    }

    #[test]
    fn test_remove_missing_reports_not_found() {
        let mut a = assignment();
        assert!(!a.remove_submission(999, Date::new(2025, 10, 14)));
    }

    #[test]
    fn test_grade_all_is_idempotent() {
        let mut a = assignment();
        a.add_submission(1, "Hello Frodo!\n".into(), Date::new(2025, 10, 14))
            .unwrap();
        a.add_submission(2, "wrong output".into(), Date::new(2025, 10, 14))
            .unwrap();

        a.grade_all_submissions();
        let first: Vec<_> = a.submissions().iter().map(|s| s.mark()).collect();
        a.grade_all_submissions();
        let second: Vec<_> = a.submissions().iter().map(|s| s.mark()).collect();

        assert_eq!(first, second);
        assert_eq!(first[0].score(), 100);
        assert_eq!(first[1].score(), 0);
    }

    #[test]
    fn test_fail_closed_default_due_date() {
        let rubric = Rubric::new(vec![], vec![]).unwrap();
        let mut a = Assignment::new("A1", "", Date::default(), rubric);
        // No due date configured: every real submission is late.
        let result = a.add_submission(1, "out".into(), Date::new(2025, 1, 1));
        assert_eq!(result, Err(Rejection::Late));
    }

    #[test]
    fn test_updating_due_date_reopens_admission() {
        let rubric = Rubric::new(vec![], vec![]).unwrap();
        let mut a = Assignment::new("A1", "", Date::default(), rubric);
        a.update_due_date(Date::new(2025, 12, 31));
        assert!(a.add_submission(1, "out".into(), Date::new(2025, 1, 1)).is_ok());
    }
}
