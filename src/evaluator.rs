use crate::models::EnrollmentRecord;
use crate::term;

/// Status codes that count as in-progress credit when no grade is recorded.
pub const IN_PROGRESS_STATUSES: [&str; 2] = ["N", "A"];

/// Whether `student_id` satisfied `prerequisite` for a course taken in `deadline`.
///
/// Any one of the student's records for the prerequisite is enough, via either
/// a graded completion strictly before the deadline or in-progress credit up to
/// and including the deadline term. Records belonging to other students are ignored.
pub fn has_completed<'a>(
    student_id: &str,
    prerequisite: &str,
    deadline: &str,
    history: impl IntoIterator<Item = &'a EnrollmentRecord>,
) -> bool {
    history
        .into_iter()
        .filter(|record| record.student_id == student_id && record.course == prerequisite)
        .any(|record| graded_before(record, deadline) || in_progress_credit(record, deadline))
}

/// A non-empty verified grade earned in a term strictly before `deadline`.
pub fn graded_before(record: &EnrollmentRecord, deadline: &str) -> bool {
    record.has_grade() && term::is_before(&record.term, deadline)
}

/// Status `N` or `A` with no grade, in or before the `deadline` term.
pub fn in_progress_credit(record: &EnrollmentRecord, deadline: &str) -> bool {
    IN_PROGRESS_STATUSES.contains(&record.status.as_str())
        && !record.has_grade()
        && (term::is_before(&record.term, deadline) || record.term == deadline)
}
