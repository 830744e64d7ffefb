// Error taxonomy for ingestion and lookups

use std::path::PathBuf;

/// A bank or branch code that does not canonicalize to its fixed width.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bank code: {0:?} (expected up to 4 digits)")]
    BankCode(String),

    #[error("invalid branch code: {0:?} (expected up to 3 digits)")]
    BranchCode(String),
}

/// Inconsistent or unordered source records. Always fatal for a build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestionError {
    /// Branch record whose bank has no preceding header.
    #[error("line {line}: branch {branch_code} references unknown bank {bank_code}")]
    UnknownBank {
        line: usize,
        bank_code: String,
        branch_code: String,
    },

    /// Sub-office record whose primary branch has not been seen yet.
    #[error("line {line}: sub-office of {bank_code}-{branch_code} appears before its primary branch")]
    UnknownPrimaryBranch {
        line: usize,
        bank_code: String,
        branch_code: String,
    },

    #[error("line {line}: duplicate header for bank {bank_code}")]
    DuplicateBank { line: usize, bank_code: String },

    #[error("line {line}: duplicate primary branch {bank_code}-{branch_code}")]
    DuplicateBranch {
        line: usize,
        bank_code: String,
        branch_code: String,
    },

    #[error("line {line}: unknown record type {value:?}")]
    InvalidRecordType { line: usize, value: String },

    #[error("line {line}: unknown sub-branch flag {value:?}")]
    InvalidSubBranchFlag { line: usize, value: String },

    #[error("line {line}: malformed {field} {value:?}")]
    MalformedCode {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: record has no {field}")]
    MissingField { line: usize, field: &'static str },
}

/// All errors surfaced by the crate.
#[derive(Debug, thiserror::Error)]
pub enum ZenginError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// Store opened but the `bank`/`branch` tables are not there.
    #[error("store {path:?} has no bank/branch tables")]
    MissingSchema { path: PathBuf },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ZenginError>;
