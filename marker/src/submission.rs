//! One graded attempt by one student.

use crate::date::Date;
use crate::mark::Mark;

/// A single submission, owned by its assignment.
///
/// The captured output is what the rubric searches during grading; the mark
/// starts as the ungraded placeholder and is overwritten each time the
/// scoring engine runs. Identity within an assignment is the
/// (student id, submission date) pair.
#[derive(Debug, Clone)]
pub struct Submission {
    student_id: u32,
    assignment_name: String,
    output: String,
    submitted_at: Date,
    mark: Mark,
}

impl Submission {
    pub(crate) fn new(
        student_id: u32,
        assignment_name: String,
        output: String,
        submitted_at: Date,
    ) -> Self {
        Submission {
            student_id,
            assignment_name,
            output,
            submitted_at,
            mark: Mark::ungraded(),
        }
    }

    pub fn student_id(&self) -> u32 {
        self.student_id
    }

    pub fn assignment_name(&self) -> &str {
        &self.assignment_name
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn submitted_at(&self) -> Date {
        self.submitted_at
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub(crate) fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }

    /// True if this submission has the given identity key.
    pub fn matches(&self, student_id: u32, submitted_at: Date) -> bool {
        self.student_id == student_id && self.submitted_at == submitted_at
    }

    /// The durable report line consumers parse verbatim.
    pub fn report_line(&self) -> String {
        format!(
            "Assignment {} by student {} Graded: {}",
            self.assignment_name, self.student_id, self.mark
        )
    }
}
