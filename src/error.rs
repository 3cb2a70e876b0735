use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Column headers not found: {}", .missing.join(", "))]
    LayoutIncomplete { missing: Vec<String> },

    #[error("Invalid date: {raw}")]
    InvalidDate { raw: String },

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Unsupported word dump: {0}")]
    UnsupportedDump(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LiftError>;

/// Non-fatal findings collected while extracting one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    NoWindowFound,
    UnterminatedWindow,
    UnresolvedDates,
    InvalidDate { row: usize, raw: String },
    RowError { page: usize, detail: String },
    MalformedRecord { line: u64, detail: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindowFound => write!(f, "transaction history section not found"),
            Self::UnterminatedWindow => {
                write!(f, "end marker never found; read through the last page")
            }
            Self::UnresolvedDates => {
                write!(f, "no statement date; dates left as printed")
            }
            Self::InvalidDate { row, raw } => {
                write!(f, "transaction {row}: invalid date '{raw}', skipped")
            }
            Self::RowError { page, detail } => write!(f, "page {}: {detail}", page + 1),
            Self::MalformedRecord { line, detail } => {
                write!(f, "word dump line {line}: {detail}")
            }
        }
    }
}
