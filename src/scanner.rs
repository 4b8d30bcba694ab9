use std::collections::HashMap;

use crate::catalog::PrerequisiteCatalog;
use crate::error::AuditError;
use crate::evaluator;
use crate::models::{EnrollmentRecord, Violation};
use crate::term;

pub const DEFAULT_TARGET_TERMS: [&str; 2] = ["2025FA", "2026SP"];

/// The set of terms whose enrollments are audited in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTerms(Vec<String>);

impl TargetTerms {
    /// Validates and de-duplicates the labels, keeping the order given.
    pub fn new<I, S>(labels: I) -> Result<Self, AuditError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if term::term_value(label).is_none() {
                return Err(AuditError::InvalidTerm(label.to_string()));
            }
            if !terms.iter().any(|existing| existing == label) {
                terms.push(label.to_string());
            }
        }
        if terms.is_empty() {
            return Err(AuditError::InvalidTerm(String::new()));
        }
        Ok(Self(terms))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|term| term == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }
}

impl Default for TargetTerms {
    fn default() -> Self {
        Self(DEFAULT_TARGET_TERMS.iter().map(|t| t.to_string()).collect())
    }
}

/// One violation per target-term enrollment whose prerequisite is unmet, in input order.
///
/// Each check sees the student's full history, not just the target terms.
pub fn scan(
    enrollments: &[EnrollmentRecord],
    catalog: &PrerequisiteCatalog,
    targets: &TargetTerms,
) -> Vec<Violation> {
    let mut histories: HashMap<&str, Vec<&EnrollmentRecord>> = HashMap::new();
    for record in enrollments {
        histories
            .entry(record.student_id.as_str())
            .or_default()
            .push(record);
    }

    let mut violations = Vec::new();

    for record in enrollments {
        if !targets.contains(&record.term) {
            continue;
        }
        let Some(prerequisite) = catalog.prerequisite_for(&record.course) else {
            continue;
        };

        let history = histories
            .get(record.student_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        if !evaluator::has_completed(
            &record.student_id,
            prerequisite,
            &record.term,
            history.iter().copied(),
        ) {
            violations.push(Violation::from_enrollment(record, prerequisite));
        }
    }

    violations
}
