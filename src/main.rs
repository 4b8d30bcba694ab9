use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod catalog;
mod error;
mod evaluator;
mod models;
mod report;
mod scanner;
mod source;
mod term;

use catalog::PrerequisiteCatalog;
use error::AuditError;
use report::{AuditSummary, ReportOptions};
use scanner::TargetTerms;

#[derive(Parser)]
#[command(name = "prerequisite-audit")]
#[command(about = "Prerequisite violation audit for term enrollments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Enrollment history table (CSV)
    #[arg(long, default_value = "ST.csv")]
    enrollments: PathBuf,
    /// Prerequisite table (CSV export of the Prerequisites sheet)
    #[arg(long, default_value = "Prerequisites.csv")]
    prerequisites: PathBuf,
    /// Terms to audit, e.g. 2025FA
    #[arg(
        long = "term",
        env = "PREREQ_AUDIT_TERMS",
        value_delimiter = ',',
        default_values_t = scanner::DEFAULT_TARGET_TERMS.map(String::from)
    )]
    terms: Vec<String>,
    /// Minimum violations for a student to be listed as multi-violation
    #[arg(long, default_value_t = report::DEFAULT_MULTI_THRESHOLD)]
    multi_threshold: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan target-term enrollments and report prerequisite violations
    Audit {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, default_value = "prerequisite_violations_report.csv")]
        out: PathBuf,
        /// Also save the text report to this path
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write the aggregated summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long, default_value_t = report::DEFAULT_TOP_TYPES)]
        top: usize,
    },
    /// List the prerequisite rules that would be enforced
    Rules {
        #[arg(long, default_value = "Prerequisites.csv")]
        prerequisites: PathBuf,
    },
    /// Show the violations of a single student
    Student {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            inputs,
            out,
            report: report_path,
            json,
            top,
        } => {
            let (catalog, targets, summary) = run(&inputs)?;
            let options = ReportOptions {
                top_types: top,
                multi_threshold: inputs.multi_threshold,
            };
            let text = report::build_report(
                &summary,
                &catalog,
                &targets,
                options,
                Utc::now().date_naive(),
            );
            print!("{text}");

            if let Some(path) = report_path {
                std::fs::write(&path, &text).map_err(|source| AuditError::Export {
                    path: path.clone(),
                    source,
                })?;
                println!("\nText report saved to: {}", path.display());
            }
            if report::write_csv(&summary.violations, &out)? {
                println!("\nDetailed report saved to: {}", out.display());
            }
            if let Some(path) = json {
                report::write_json(&summary, &path)?;
                println!("Summary JSON saved to: {}", path.display());
            }
            println!("\nAnalysis complete!");
        }
        Commands::Rules { prerequisites } => {
            let catalog = load_catalog(&prerequisites)?;
            println!("Found {} prerequisite requirements", catalog.len());
            for rule in catalog.rules() {
                println!("  {} → requires {}", rule.course, rule.required_course);
            }
        }
        Commands::Student { inputs, id } => {
            let (_, targets, summary) = run(&inputs)?;
            match summary.student(&id) {
                Some(student) => print!("{}", report::build_student_report(student)),
                None => println!(
                    "No prerequisite violations for student {id} in {}.",
                    targets.labels().join(", ")
                ),
            }
        }
    }

    Ok(())
}

fn run(inputs: &Inputs) -> anyhow::Result<(PrerequisiteCatalog, TargetTerms, AuditSummary)> {
    let targets = TargetTerms::new(&inputs.terms)?;

    info!(path = %inputs.enrollments.display(), "loading enrollment data");
    let enrollments = source::load_enrollments(&inputs.enrollments).with_context(missing_inputs)?;
    let catalog = load_catalog(&inputs.prerequisites)?;

    info!(terms = ?targets.labels(), "analyzing violations");
    let violations = scanner::scan(&enrollments, &catalog, &targets);
    info!(violations = violations.len(), "scan finished");

    let summary = report::aggregate(violations, inputs.multi_threshold);
    Ok((catalog, targets, summary))
}

fn load_catalog(path: &Path) -> anyhow::Result<PrerequisiteCatalog> {
    info!(path = %path.display(), "building prerequisites map");
    let rows = source::load_prerequisites(path).with_context(missing_inputs)?;
    let catalog = PrerequisiteCatalog::build(&rows);
    if catalog.is_empty() {
        warn!(path = %path.display(), "prerequisite table produced no rules");
    } else {
        info!(rules = catalog.len(), "found prerequisite requirements");
    }
    Ok(catalog)
}

fn missing_inputs() -> &'static str {
    "both the enrollment history (--enrollments) and the prerequisite table \
     (--prerequisites) must be readable CSV files"
}
