use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn audit_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_groupscholar-prerequisite-audit"));
    cmd.env_remove("PREREQ_AUDIT_TERMS").env("RUST_LOG", "warn");
    cmd
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn scratch(name: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn run_audit(out: &Path, extra: &[&str]) -> Output {
    let out = out.to_string_lossy().into_owned();
    audit_cmd()
        .args([
            "audit",
            "--enrollments",
            &fixture("enrollments.csv"),
            "--prerequisites",
            &fixture("prerequisites.csv"),
            "--out",
            &out,
        ])
        .args(extra)
        .output()
        .expect("failed to run prerequisite-audit")
}

#[test]
fn audit_reports_violations_and_exports_csv() {
    let out = scratch("audit_violations.csv");
    let output = run_audit(&out, &[]);

    assert!(
        output.status.success(),
        "audit should succeed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Violations Found: 6"));
    assert!(stdout.contains("Students Affected: 3"));
    assert!(stdout.contains("Terms Analyzed: 2025FA (Fall 2025) and 2026SP (Spring 2026)"));
    assert!(stdout.contains("  CS201 → requires CS101"));
    assert!(!stdout.contains("AI300"));
    assert!(stdout.contains("  1. MA201 without MA101: 3 violations"));
    assert!(stdout.contains("STUDENTS WITH 4+ VIOLATIONS:"));
    assert!(stdout.contains("Analysis complete!"));

    let details = &stdout[stdout.find("DETAILED VIOLATION LIST").unwrap()..];
    let blake = details.find("Blake Ortiz (ID: 1002)").unwrap();
    let avery = details.find("Avery Lee (ID: 1001)").unwrap();
    let kiara = details.find("Kiara Patel (ID: 1003)").unwrap();
    assert!(blake < avery && avery < kiara);

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 6);
    assert_eq!(
        rows[0].iter().collect::<Vec<_>>(),
        vec![
            "1001",
            "Avery Lee",
            "avery.lee@example.edu",
            "2025FA",
            "MA201",
            "MA101",
            "N",
            "",
        ]
    );
    let kiara_rows: Vec<&csv::StringRecord> = rows.iter().filter(|row| &row[0] == "1003").collect();
    assert_eq!(kiara_rows.len(), 1);
    assert_eq!(&kiara_rows[0][4], "MA201");
}

#[test]
fn clean_run_prints_zero_summary_without_csv() {
    let out = scratch("audit_clean.csv");
    let output = run_audit(&out, &["--term", "2024FA"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Violations Found: 0"));
    assert!(stdout.contains("Terms Analyzed: 2024FA (Fall 2024)"));
    assert!(!out.exists());
}

#[test]
fn json_summary_is_written() {
    let out = scratch("audit_json.csv");
    let json = scratch("audit_summary.json");
    let json_arg = json.to_string_lossy().into_owned();
    let output = run_audit(&out, &["--json", &json_arg]);

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(summary["total_violations"], 6);
    assert_eq!(summary["distinct_students"], 3);
    assert_eq!(summary["multi_violation_students"][0]["student_id"], "1002");
}

#[test]
fn missing_input_is_fatal() {
    let out = scratch("audit_missing.csv");
    let out_arg = out.to_string_lossy().into_owned();
    let output = audit_cmd()
        .args([
            "audit",
            "--enrollments",
            "does-not-exist.csv",
            "--prerequisites",
            &fixture("prerequisites.csv"),
            "--out",
            &out_arg,
        ])
        .output()
        .expect("failed to run prerequisite-audit");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not read enrollment table"), "stderr={stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("EXECUTIVE SUMMARY"));
    assert!(!out.exists());
}

#[test]
fn invalid_target_term_is_rejected() {
    let out = scratch("audit_bad_term.csv");
    let output = run_audit(&out, &["--term", "Fall"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid target term"));
}

#[test]
fn rules_lists_catalog() {
    let output = audit_cmd()
        .args(["rules", "--prerequisites", &fixture("prerequisites.csv")])
        .output()
        .expect("failed to run prerequisite-audit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 4 prerequisite requirements"));
    assert!(stdout.contains("  IT210 → requires IT110"));
}

#[test]
fn student_view_shows_one_student() {
    let output = audit_cmd()
        .args([
            "student",
            "--enrollments",
            &fixture("enrollments.csv"),
            "--prerequisites",
            &fixture("prerequisites.csv"),
            "--id",
            "1002",
        ])
        .output()
        .expect("failed to run prerequisite-audit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Violations: 4"));
    assert!(stdout.contains("  • 2026SP: Enrolled in CS401 without completing CS301"));
    assert!(!stdout.contains("Avery"));
}
