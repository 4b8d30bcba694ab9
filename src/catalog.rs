use std::collections::HashMap;

use tracing::debug;

use crate::models::{PrerequisiteRow, PrerequisiteRule};

/// Course -> single required prerequisite, in first-seen course order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteCatalog {
    rules: Vec<PrerequisiteRule>,
    index: HashMap<String, usize>,
}

impl PrerequisiteCatalog {
    /// Builds the catalog from decoded rows. The first row is the sheet's
    /// header and is always skipped. Rows missing either field are dropped;
    /// a repeated course keeps its position but takes the later prerequisite.
    pub fn build(rows: &[PrerequisiteRow]) -> Self {
        let mut catalog = Self::default();

        for (position, row) in rows.iter().enumerate().skip(1) {
            match (non_empty(row.course.as_deref()), non_empty(row.prerequisite.as_deref())) {
                (Some(course), Some(prerequisite)) => catalog.insert(course, prerequisite),
                _ => debug!(position, "skipping incomplete prerequisite row"),
            }
        }

        catalog
    }

    fn insert(&mut self, course: &str, prerequisite: &str) {
        if let Some(&slot) = self.index.get(course) {
            self.rules[slot].required_course = prerequisite.to_string();
            return;
        }
        self.index.insert(course.to_string(), self.rules.len());
        self.rules.push(PrerequisiteRule {
            course: course.to_string(),
            required_course: prerequisite.to_string(),
        });
    }

    pub fn prerequisite_for(&self, course: &str) -> Option<&str> {
        self.index
            .get(course)
            .map(|&slot| self.rules[slot].required_course.as_str())
    }

    pub fn rules(&self) -> &[PrerequisiteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|value| !value.is_empty())
}
