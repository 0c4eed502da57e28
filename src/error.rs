use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    /// Shared reference table absent; nothing can be processed without it.
    #[error("Reference file not found: {0}")]
    MissingReferenceFile(PathBuf),

    #[error("Company data file not found: {0}")]
    MissingCompanyFile(PathBuf),

    #[error("{file}: missing required columns: {}", .columns.join(", "))]
    SchemaViolation { file: String, columns: Vec<String> },

    #[error("{file}: worksheet has no header row")]
    EmptyWorksheet { file: String },

    #[error("Company roster must contain 'CNPJ' and 'Nome' columns")]
    InvalidRoster,

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Roster error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatementError>;
