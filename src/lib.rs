//! # Financial Statement Builder
//!
//! A library for turning per-company ledger exports (accounts payable and
//! receivable rows) into monthly DRE and DFC statements, delivered as styled
//! spreadsheets.
//!
//! ## Core Concepts
//!
//! - **DRE**: accrual-basis income statement, bucketed by the Competência date
//! - **DFC**: cash-basis cash flow statement, bucketed by the Liquidação date
//! - **Pivot**: accounts on rows, the calendar months present in the data on
//!   columns, plus a trailing Total column
//! - **Batch**: companies are processed independently; one company's failure
//!   never aborts the run
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_statement_builder::*;
//!
//! let processor = StatementProcessor::new("./input", "./output")?;
//! let jobs = read_company_roster("./empresas.csv".as_ref())?;
//! let report = processor.process_batch(&jobs);
//! report.log_summary();
//! ```

pub mod aggregate;
pub mod batch;
pub mod error;
pub mod normalize;
pub mod pivot;
pub mod reference;
pub mod render;
pub mod schema;
pub mod utils;
pub mod validate;
pub mod workbook;

pub use aggregate::aggregate_by_account_month;
pub use batch::{read_company_roster, BatchReport, CompletedJob, FailedJob, StatementProcessor};
pub use error::{Result, StatementError};
pub use normalize::normalize_records;
pub use pivot::{pivot_statement, PivotRow, PivotedStatement};
pub use reference::{ReferenceData, CHART_OF_ACCOUNTS_FILE, COST_CENTERS_FILE};
pub use render::write_statements;
pub use schema::{AggregateRow, CompanyJob, StatementKind, TransactionRecord};
pub use utils::*;
pub use validate::{
    discover_company_files, validate_batch, validate_company_file, FileValidation,
    ValidationReport, REQUIRED_COLUMNS,
};
pub use workbook::{read_table, Cell, Table};

/// Aggregates and pivots a normalized record set for one statement kind.
pub fn build_statement(records: &[TransactionRecord], kind: StatementKind) -> PivotedStatement {
    let aggregates = aggregate_by_account_month(records, kind);
    pivot_statement(&aggregates, kind)
}
