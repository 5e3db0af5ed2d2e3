//! Error types for slipday.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SlipError>;

#[derive(Debug, Error)]
pub enum SlipError {
    /// Snapshot has no column naming the person.
    #[error("missing identity column: {0}")]
    MissingIdentityColumn(String),

    /// Snapshot has no header matching the attendance pattern.
    #[error("no attendance columns detected: {0}")]
    NoAttendanceColumns(String),

    /// Save file exists but could not be read back. Never overwritten silently.
    #[error("corrupt save file {}: {reason}", path.display())]
    CorruptSaveFile { path: PathBuf, reason: String },

    #[error("insufficient credit: {0}")]
    InsufficientCredit(String),

    #[error("no snapshot available: {0}")]
    NoSnapshot(String),

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("ambiguous selector: {0}")]
    AmbiguousSelector(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SlipError {
    /// Stable machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingIdentityColumn(_) => "missing_identity_column",
            Self::NoAttendanceColumns(_) => "no_attendance_columns",
            Self::CorruptSaveFile { .. } => "corrupt_save_file",
            Self::InsufficientCredit(_) => "insufficient_credit",
            Self::NoSnapshot(_) => "no_snapshot",
            Self::RecordNotFound(_) => "record_not_found",
            Self::AmbiguousSelector(_) => "ambiguous_selector",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Csv(_) => "csv",
            Self::Json(_) => "json",
            Self::Toml(_) => "toml",
        }
    }
}
