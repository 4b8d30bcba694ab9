/// Comparable value for a term label such as `2025FA`: `year * 10 + semester rank`.
///
/// Unknown semester codes rank 0, ahead of every recognized term in the same
/// year. Labels without a four-digit year prefix have no value.
pub fn term_value(label: &str) -> Option<i32> {
    let year = label.get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    Some(year * 10 + semester_rank(&label[4..]))
}

pub fn semester_rank(code: &str) -> i32 {
    match code {
        "SP" => 1,
        "SU" => 2,
        "FA" => 3,
        _ => 0,
    }
}

/// Strictly-before comparison. Missing or unparseable labels are never before anything.
pub fn is_before(a: &str, b: &str) -> bool {
    match (term_value(a), term_value(b)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

/// `2025FA` -> `2025FA (Fall 2025)`; labels that do not parse are returned as-is.
pub fn describe(label: &str) -> String {
    if term_value(label).is_none() {
        return label.to_string();
    }
    let season = match &label[4..] {
        "SP" => "Spring",
        "SU" => "Summer",
        "FA" => "Fall",
        _ => return label.to_string(),
    };
    format!("{} ({} {})", label, season, &label[..4])
}
