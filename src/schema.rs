use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The date regime used to bucket transactions into calendar months.
///
/// This is the single most important business rule in the pipeline: the same
/// transaction lands in different months (or in none at all) depending on
/// which statement is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StatementKind {
    /// DRE: accrual basis, bucketed by the Competência date.
    Accrual,
    /// DFC: cash basis, bucketed by the Liquidação date.
    Cash,
}

impl StatementKind {
    pub fn sheet_name(&self) -> &'static str {
        match self {
            StatementKind::Accrual => "DRE",
            StatementKind::Cash => "DFC",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StatementKind::Accrual => "Demonstrativo de Resultados",
            StatementKind::Cash => "Demonstrativo de Fluxo de Caixa",
        }
    }

    /// Selects the date that buckets `record` into a month under this regime.
    pub fn bucket_date(&self, record: &TransactionRecord) -> Option<NaiveDate> {
        match self {
            StatementKind::Accrual => record.accrual_date,
            StatementKind::Cash => record.settlement_date,
        }
    }
}

/// One ledger entry after normalization.
///
/// Every date and amount is optional: a cell that failed to parse is stored as
/// `None`, never as a partial value. Only `record_id` is required — rows
/// without it are discarded during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub record_id: String,
    pub entry_type: Option<String>,
    pub installment: Option<String>,
    pub company: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub settlement_date: Option<NaiveDate>,
    pub gross_amount: Option<Decimal>,
    pub cost_center: Option<String>,
    pub net_amount: Option<Decimal>,
    pub bank_account: Option<String>,
    pub notes: Option<String>,
    pub accrual_date: Option<NaiveDate>,
    /// Chart-of-accounts label ("Plano de Contas"); the row axis of both
    /// statements.
    pub account: Option<String>,
    pub counterparty: Option<String>,
    pub status: Option<String>,
    pub acquirer: Option<String>,
}

/// One summed cell of the long-form aggregation: the net amount an account
/// accumulated in a calendar month under one date regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub account: String,
    /// Calendar month number, 1..=12.
    pub month: u32,
    pub net_amount: Decimal,
}

/// A company submitted to the batch driver: tax id (also the data file stem)
/// plus the display name used in titles and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyJob {
    pub tax_id: String,
    pub display_name: String,
}
