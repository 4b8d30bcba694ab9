use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::PrerequisiteCatalog;
use crate::error::AuditError;
use crate::models::{StudentViolations, Violation, ViolationTypeCount};
use crate::scanner::TargetTerms;
use crate::term;

pub const DEFAULT_TOP_TYPES: usize = 10;
pub const DEFAULT_MULTI_THRESHOLD: usize = 4;

/// Everything the text report and the exports read from.
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub total_violations: usize,
    pub distinct_students: usize,
    /// Every violation type, most frequent first; ties keep discovery order.
    pub violation_types: Vec<ViolationTypeCount>,
    /// Most violations first, then by name; violations ordered by term and course.
    pub students: Vec<StudentViolations>,
    pub multi_violation_students: Vec<StudentViolations>,
    #[serde(skip)]
    pub violations: Vec<Violation>,
}

impl AuditSummary {
    pub fn top_violation_types(&self, limit: usize) -> &[ViolationTypeCount] {
        &self.violation_types[..limit.min(self.violation_types.len())]
    }

    pub fn student(&self, student_id: &str) -> Option<&StudentViolations> {
        self.students
            .iter()
            .find(|student| student.student_id == student_id)
    }
}

pub fn summarize_by_type(violations: &[Violation]) -> Vec<ViolationTypeCount> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut counts: Vec<ViolationTypeCount> = Vec::new();

    for violation in violations {
        let key = (violation.course.as_str(), violation.missing_prerequisite.as_str());
        let slot = *slots.entry(key).or_insert_with(|| {
            counts.push(ViolationTypeCount {
                course: violation.course.clone(),
                missing_prerequisite: violation.missing_prerequisite.clone(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Groups violations by student in order of each student's first violation.
pub fn group_by_student(violations: &[Violation]) -> Vec<StudentViolations> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut students: Vec<StudentViolations> = Vec::new();

    for violation in violations {
        let slot = *slots.entry(violation.student_id.as_str()).or_insert_with(|| {
            students.push(StudentViolations {
                student_id: violation.student_id.clone(),
                student_name: violation.student_name.clone(),
                email: violation.email.clone(),
                violations: Vec::new(),
            });
            students.len() - 1
        });
        students[slot].violations.push(violation.clone());
    }

    students
}

pub fn aggregate(violations: Vec<Violation>, multi_threshold: usize) -> AuditSummary {
    let distinct_students = violations
        .iter()
        .map(|violation| violation.student_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let violation_types = summarize_by_type(&violations);
    let grouped = group_by_student(&violations);

    let mut multi_violation_students: Vec<StudentViolations> = grouped
        .iter()
        .filter(|student| student.count() >= multi_threshold)
        .cloned()
        .collect();
    multi_violation_students.sort_by(|a, b| b.count().cmp(&a.count()));

    let mut students = grouped;
    students.sort_by(|a, b| {
        b.count()
            .cmp(&a.count())
            .then_with(|| a.student_name.cmp(&b.student_name))
    });
    for student in &mut students {
        student.violations.sort_by(|a, b| {
            term_order(&a.term, &b.term).then_with(|| a.course.cmp(&b.course))
        });
    }

    AuditSummary {
        total_violations: violations.len(),
        distinct_students,
        violation_types,
        students,
        multi_violation_students,
        violations,
    }
}

// Chronological where both labels parse, label order otherwise.
fn term_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (term::term_value(a), term::term_value(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub top_types: usize,
    pub multi_threshold: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_types: DEFAULT_TOP_TYPES,
            multi_threshold: DEFAULT_MULTI_THRESHOLD,
        }
    }
}

pub fn build_report(
    summary: &AuditSummary,
    catalog: &PrerequisiteCatalog,
    targets: &TargetTerms,
    options: ReportOptions,
    generated: NaiveDate,
) -> String {
    let banner = "=".repeat(80);
    let terms: Vec<&str> = targets.labels().iter().map(String::as_str).collect();
    let described: Vec<String> = terms.iter().map(|label| term::describe(label)).collect();

    let mut output = String::new();
    let _ = writeln!(output, "{banner}");
    let _ = writeln!(output, "PREREQUISITE VIOLATIONS REPORT");
    let _ = writeln!(
        output,
        "Students Enrolled in {} Without Meeting Prerequisites",
        terms.join(" & ")
    );
    let _ = writeln!(output, "Generated {generated}");
    let _ = writeln!(output, "{banner}");

    let _ = writeln!(output);
    let _ = writeln!(output, "EXECUTIVE SUMMARY:");
    let _ = writeln!(output, "Total Violations Found: {}", summary.total_violations);
    let _ = writeln!(output, "Students Affected: {}", summary.distinct_students);
    let _ = writeln!(output, "Terms Analyzed: {}", described.join(" and "));

    let _ = writeln!(output);
    let _ = writeln!(output, "PREREQUISITE REQUIREMENTS ANALYZED:");
    for rule in catalog.rules() {
        let _ = writeln!(output, "  {} → requires {}", rule.course, rule.required_course);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "MOST COMMON VIOLATIONS:");
    if summary.violation_types.is_empty() {
        let _ = writeln!(output, "  None found.");
    }
    for (rank, kind) in summary.top_violation_types(options.top_types).iter().enumerate() {
        let _ = writeln!(output, "  {}. {}: {} violations", rank + 1, kind.label(), kind.count);
    }

    if !summary.multi_violation_students.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "STUDENTS WITH {}+ VIOLATIONS:", options.multi_threshold);
        for student in &summary.multi_violation_students {
            let _ = writeln!(output);
            let _ = writeln!(output, "{} (ID: {})", student.student_name, student.student_id);
            let _ = writeln!(output, "Email: {}", student.email);
            let _ = writeln!(output, "Total violations: {}", student.count());
            for violation in &student.violations {
                let _ = writeln!(
                    output,
                    "  • {}: {} without {}",
                    violation.term, violation.course, violation.missing_prerequisite
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{banner}");
    let _ = writeln!(output, "DETAILED VIOLATION LIST");
    let _ = writeln!(output, "{banner}");
    for student in &summary.students {
        write_student(&mut output, student);
    }

    output
}

pub fn build_student_report(student: &StudentViolations) -> String {
    let mut output = String::new();
    write_student(&mut output, student);
    output
}

fn write_student(output: &mut String, student: &StudentViolations) {
    let _ = writeln!(output);
    let _ = writeln!(output, "{} (ID: {})", student.student_name, student.student_id);
    let _ = writeln!(output, "Email: {}", student.email);
    let _ = writeln!(output, "Violations: {}", student.count());
    for violation in &student.violations {
        let _ = writeln!(
            output,
            "  • {}: Enrolled in {} without completing {}",
            violation.term, violation.course, violation.missing_prerequisite
        );
    }
}

/// Writes one row per violation. Returns `false` without touching the path when there are none.
pub fn write_csv(violations: &[Violation], path: &Path) -> Result<bool, AuditError> {
    if violations.is_empty() {
        return Ok(false);
    }
    let export = |source: std::io::Error| AuditError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|err| export(err.into()))?;
    for violation in violations {
        writer.serialize(violation).map_err(|err| export(err.into()))?;
    }
    writer.flush().map_err(export)?;
    Ok(true)
}

pub fn write_json(summary: &AuditSummary, path: &Path) -> Result<(), AuditError> {
    let export = |source: std::io::Error| AuditError::Export {
        path: path.to_path_buf(),
        source,
    };
    let body = serde_json::to_string_pretty(summary).map_err(|err| export(err.into()))?;
    std::fs::write(path, body).map_err(export)
}
