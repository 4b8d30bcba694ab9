use serde::Serialize;

/// One row of a student's course history.
#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub term: String,
    pub course: String,
    pub status: String,
    pub verified_grade: Option<String>,
}

impl EnrollmentRecord {
    pub fn student_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_grade(&self) -> bool {
        self.verified_grade
            .as_deref()
            .is_some_and(|grade| !grade.is_empty())
    }
}

/// A prerequisite-table row after positional decoding at the source boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteRow {
    pub course: Option<String>,
    pub prerequisite: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteRule {
    pub course: String,
    pub required_course: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub student_id: String,
    pub student_name: String,
    pub email: String,
    pub term: String,
    pub course: String,
    pub missing_prerequisite: String,
    pub current_status: String,
    pub verified_grade: String,
}

impl Violation {
    pub fn from_enrollment(record: &EnrollmentRecord, missing_prerequisite: &str) -> Self {
        Self {
            student_id: record.student_id.clone(),
            student_name: record.student_name(),
            email: record.email.clone().unwrap_or_default(),
            term: record.term.clone(),
            course: record.course.clone(),
            missing_prerequisite: missing_prerequisite.to_string(),
            current_status: record.status.clone(),
            verified_grade: record.verified_grade.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationTypeCount {
    pub course: String,
    pub missing_prerequisite: String,
    pub count: usize,
}

impl ViolationTypeCount {
    /// Rendered as e.g. `CS201 without CS101`.
    pub fn label(&self) -> String {
        format!("{} without {}", self.course, self.missing_prerequisite)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentViolations {
    pub student_id: String,
    pub student_name: String,
    pub email: String,
    pub violations: Vec<Violation>,
}

impl StudentViolations {
    pub fn count(&self) -> usize {
        self.violations.len()
    }
}
