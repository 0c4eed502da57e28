use crate::error::{Result, StatementError};
use crate::schema::TransactionRecord;
use crate::utils::{excel_serial_to_date, parse_amount_str, parse_date_str};
use crate::workbook::{Cell, Table};
use chrono::NaiveDate;
use log::debug;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Columns the aggregation pipeline actually reads. A company file missing
/// any of these cannot be processed; the full 17-column schema check lives in
/// the validator.
const PIPELINE_COLUMNS: [&str; 5] = [
    "Registro",
    "Liquidação",
    "Valor Líquido",
    "Competência",
    "Plano de Contas",
];

/// Turns a raw worksheet into typed transaction records.
///
/// Cell-level parse failures are absorbed: an unparseable date or amount is
/// stored as `None` and the row survives. The only row-level filter is the
/// `Registro` field — rows without it are dropped.
pub fn normalize_records(table: &Table, file: &str) -> Result<Vec<TransactionRecord>> {
    let missing: Vec<String> = PIPELINE_COLUMNS
        .iter()
        .filter(|column| table.column_index(column).is_none())
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StatementError::SchemaViolation {
            file: file.to_string(),
            columns: missing,
        });
    }

    let mut records = Vec::with_capacity(table.len());
    let mut dropped = 0usize;

    for row in &table.rows {
        let Some(record_id) = text_value(table, row, "Registro") else {
            dropped += 1;
            continue;
        };

        records.push(TransactionRecord {
            record_id,
            entry_type: text_value(table, row, "Tipo"),
            installment: text_value(table, row, "Parcela"),
            company: text_value(table, row, "Empresa"),
            issue_date: date_value(table, row, "Emissão"),
            due_date: date_value(table, row, "Vencimento"),
            settlement_date: date_value(table, row, "Liquidação"),
            gross_amount: amount_value(table, row, "Valor Bruto"),
            cost_center: text_value(table, row, "Centro de Custos"),
            net_amount: amount_value(table, row, "Valor Líquido"),
            bank_account: text_value(table, row, "Conta"),
            notes: text_value(table, row, "Observações"),
            accrual_date: date_value(table, row, "Competência"),
            account: text_value(table, row, "Plano de Contas"),
            counterparty: text_value(table, row, "Cliente / Fornecedor"),
            status: text_value(table, row, "Status"),
            acquirer: text_value(table, row, "Adquirente / Bandeira"),
        });
    }

    if dropped > 0 {
        debug!("{file}: dropped {dropped} rows without a Registro value");
    }
    Ok(records)
}

/// Best-effort date from a cell; unparseable values become `None`.
pub fn date_value(table: &Table, row: &[Cell], column: &str) -> Option<NaiveDate> {
    match table.cell(row, column)? {
        Cell::Date(date) => Some(*date),
        Cell::Text(text) => parse_date_str(text),
        Cell::Number(serial) => excel_serial_to_date(*serial),
        _ => None,
    }
}

/// Best-effort decimal from a cell; unparseable values become `None`.
pub fn amount_value(table: &Table, row: &[Cell], column: &str) -> Option<Decimal> {
    match table.cell(row, column)? {
        Cell::Number(value) => Decimal::from_f64(*value),
        Cell::Text(text) => parse_amount_str(text),
        _ => None,
    }
}

fn text_value(table: &Table, row: &[Cell], column: &str) -> Option<String> {
    match table.cell(row, column)? {
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        // Identifiers exported as numeric cells keep their integer spelling.
        Cell::Number(value) => {
            if value.fract() == 0.0 {
                Some(format!("{}", *value as i64))
            } else {
                Some(value.to_string())
            }
        }
        Cell::Date(date) => Some(date.to_string()),
        Cell::Bool(value) => Some(value.to_string()),
        Cell::Empty => None,
    }
}
