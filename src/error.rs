use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("could not read {table} table at {}", path.display())]
    InputUnavailable {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed {table} table at {}, line {line}", path.display())]
    MalformedInput {
        table: &'static str,
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("invalid target term {0:?}: expected a label like 2025FA")]
    InvalidTerm(String),
    #[error("failed to write {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
