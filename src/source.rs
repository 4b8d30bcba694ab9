use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::AuditError;
use crate::models::{EnrollmentRecord, PrerequisiteRow};

const ENROLLMENT_TABLE: &str = "enrollment";
const PREREQUISITE_TABLE: &str = "prerequisite";

// Field positions in the prerequisites sheet.
const COURSE_COLUMN: usize = 1;
const PREREQUISITE_COLUMN: usize = 3;

/// Enrollment columns by their trimmed header names. Everything past the id
/// is optional so a short row decodes its missing trailing cells as absent.
#[derive(Debug, Deserialize)]
struct EnrollmentRow {
    #[serde(rename = "Student Id")]
    student_id: String,
    #[serde(rename = "First Name")]
    first_name: Option<String>,
    #[serde(rename = "Last Name")]
    last_name: Option<String>,
    #[serde(rename = "Student Email")]
    email: Option<String>,
    #[serde(rename = "Term")]
    term: Option<String>,
    #[serde(rename = "Course Name")]
    course: Option<String>,
    #[serde(rename = "Current Status")]
    status: Option<String>,
    #[serde(rename = "Verified Grade")]
    verified_grade: Option<String>,
}

impl From<EnrollmentRow> for EnrollmentRecord {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            student_id: row.student_id,
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            email: row.email,
            term: row.term.unwrap_or_default(),
            course: row.course.unwrap_or_default(),
            status: row.status.unwrap_or_default(),
            verified_grade: row.verified_grade,
        }
    }
}

fn enrollment_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::Headers).flexible(true);
    builder
}

fn prerequisite_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true);
    builder
}

pub fn load_enrollments(path: &Path) -> Result<Vec<EnrollmentRecord>, AuditError> {
    let reader = enrollment_reader()
        .from_path(path)
        .map_err(|source| unavailable(ENROLLMENT_TABLE, path, source))?;
    let records = read_enrollments(reader, path)?;
    info!(path = %path.display(), rows = records.len(), "loaded enrollment history");
    Ok(records)
}

pub fn read_enrollments<R: Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
) -> Result<Vec<EnrollmentRecord>, AuditError> {
    let mut records = Vec::new();
    for result in reader.deserialize::<EnrollmentRow>() {
        let row = result.map_err(|source| malformed(ENROLLMENT_TABLE, path, source))?;
        records.push(EnrollmentRecord::from(row));
    }
    Ok(records)
}

pub fn load_prerequisites(path: &Path) -> Result<Vec<PrerequisiteRow>, AuditError> {
    let reader = prerequisite_reader()
        .from_path(path)
        .map_err(|source| unavailable(PREREQUISITE_TABLE, path, source))?;
    let rows = read_prerequisites(reader, path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded prerequisite table");
    Ok(rows)
}

/// Decodes each record by position into a named row. The sheet's own header
/// line is consumed by the reader; every data record, including the leading
/// title row the catalog skips, is returned.
pub fn read_prerequisites<R: Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
) -> Result<Vec<PrerequisiteRow>, AuditError> {
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| malformed(PREREQUISITE_TABLE, path, source))?;
        rows.push(PrerequisiteRow {
            course: record.get(COURSE_COLUMN).map(str::to_string),
            prerequisite: record.get(PREREQUISITE_COLUMN).map(str::to_string),
        });
    }
    Ok(rows)
}

fn unavailable(table: &'static str, path: &Path, source: csv::Error) -> AuditError {
    AuditError::InputUnavailable {
        table,
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(table: &'static str, path: &Path, source: csv::Error) -> AuditError {
    let line = source.position().map(|position| position.line()).unwrap_or(0);
    AuditError::MalformedInput {
        table,
        path: path.to_path_buf(),
        line,
        source,
    }
}
