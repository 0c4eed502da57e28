use crate::error::Result;
use crate::normalize::{amount_value, date_value};
use crate::reference::{CHART_OF_ACCOUNTS_FILE, COST_CENTERS_FILE};
use crate::workbook::{file_label, read_table, Table};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The full column schema a company file must carry.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "Registro",
    "Tipo",
    "Parcela",
    "Empresa",
    "Emissão",
    "Vencimento",
    "Liquidação",
    "Valor Bruto",
    "Centro de Custos",
    "Valor Líquido",
    "Conta",
    "Observações",
    "Competência",
    "Plano de Contas",
    "Cliente / Fornecedor",
    "Status",
    "Adquirente / Bandeira",
];

// Below these thresholds a column is probably misformatted at the source.
const DATE_VALIDITY_THRESHOLD: f64 = 50.0;
const AMOUNT_VALIDITY_THRESHOLD: f64 = 80.0;

/// Outcome of checking one company file: hard errors make it invalid,
/// warnings and info lines are advisory.
#[derive(Debug, Clone, Serialize)]
pub struct FileValidation {
    pub file_name: String,
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl FileValidation {
    fn new(file_name: String) -> Self {
        Self {
            file_name,
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    fn error(&mut self, message: String) {
        self.valid = false;
        self.errors.push(message);
    }
}

/// Validation of a whole input directory: reference-file presence plus one
/// [`FileValidation`] per company file.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub missing_references: Vec<String>,
    pub results: Vec<FileValidation>,
}

impl ValidationReport {
    pub fn valid_count(&self) -> usize {
        self.results.iter().filter(|result| result.valid).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.results.len() - self.valid_count()
    }

    pub fn all_valid(&self) -> bool {
        self.missing_references.is_empty() && self.invalid_count() == 0
    }
}

/// Checks one company file for readability, the required column schema, and
/// data quality, without generating any statements.
pub fn validate_company_file(path: &Path) -> FileValidation {
    let mut validation = FileValidation::new(file_label(path));

    let table = match read_table(path) {
        Ok(table) => table,
        Err(err) => {
            validation.error(format!("Could not read file: {err}"));
            return validation;
        }
    };

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| table.column_index(column).is_none())
        .copied()
        .collect();
    if !missing.is_empty() {
        validation.error(format!("Missing columns: {}", missing.join(", ")));
    }

    let extra: Vec<&str> = table
        .headers
        .iter()
        .filter(|header| !header.is_empty() && !REQUIRED_COLUMNS.contains(&header.as_str()))
        .map(String::as_str)
        .collect();
    if !extra.is_empty() {
        validation
            .warnings
            .push(format!("Extra columns: {}", extra.join(", ")));
    }

    if table.is_empty() {
        validation.error("File has no data rows".to_string());
        return validation;
    }
    validation.info.push(format!("{} records", table.len()));

    for column in ["Competência", "Liquidação"] {
        check_column_validity(
            &mut validation,
            &table,
            column,
            DATE_VALIDITY_THRESHOLD,
            |table, row| date_value(table, row, column).is_some(),
        );
    }
    for column in ["Valor Bruto", "Valor Líquido"] {
        check_column_validity(
            &mut validation,
            &table,
            column,
            AMOUNT_VALIDITY_THRESHOLD,
            |table, row| amount_value(table, row, column).is_some(),
        );
    }

    validation
}

fn check_column_validity<F>(
    validation: &mut FileValidation,
    table: &Table,
    column: &str,
    threshold: f64,
    is_valid: F,
) where
    F: Fn(&Table, &[crate::workbook::Cell]) -> bool,
{
    if table.column_index(column).is_none() {
        return;
    }

    let total = table.len();
    let valid = table.rows.iter().filter(|row| is_valid(table, row)).count();
    let percent = if total == 0 {
        0.0
    } else {
        valid as f64 / total as f64 * 100.0
    };

    validation
        .info
        .push(format!("{column}: {valid}/{total} valid ({percent:.1}%)"));
    if percent < threshold {
        validation.warnings.push(format!(
            "{column}: only {percent:.1}% of the values are valid"
        ));
    }
}

/// Validates the batch inputs: both reference files must exist, and every
/// company file is checked individually.
pub fn validate_batch(input_dir: &Path, tax_ids: &[String]) -> ValidationReport {
    let missing_references = [CHART_OF_ACCOUNTS_FILE, COST_CENTERS_FILE]
        .iter()
        .filter(|file| !input_dir.join(file).exists())
        .map(|file| file.to_string())
        .collect();

    let results = tax_ids
        .iter()
        .map(|tax_id| validate_company_file(&input_dir.join(format!("{tax_id}.xlsx"))))
        .collect();

    ValidationReport {
        missing_references,
        results,
    }
}

/// Finds company data files in a directory when no roster is available:
/// every `.xlsx` whose stem is all digits (which also excludes the two
/// reference files).
pub fn discover_company_files(input_dir: &Path) -> Result<Vec<String>> {
    let mut tax_ids = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        let is_xlsx = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("xlsx"));
        if !is_xlsx {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            if !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()) {
                tax_ids.push(stem.to_string());
            }
        }
    }
    tax_ids.sort();
    Ok(tax_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn write_company_file(path: &Path, headers: &[&str], with_data: bool) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Relatório de Movimentações").unwrap();
        for (index, header) in headers.iter().enumerate() {
            sheet.write_string(1, index as u16, *header).unwrap();
        }
        if with_data {
            sheet.write_string(2, 0, "1001").unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_valid_file_passes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("26888098000159.xlsx");
        write_company_file(&path, &REQUIRED_COLUMNS, true);

        let validation = validate_company_file(&path);
        assert!(validation.valid, "errors: {:?}", validation.errors);
        assert!(validation.info.iter().any(|line| line == "1 records"));
    }

    #[test]
    fn test_missing_columns_are_reported_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("111.xlsx");
        write_company_file(&path, &["Registro", "Tipo"], true);

        let validation = validate_company_file(&path);
        assert!(!validation.valid);
        assert!(validation.errors[0].contains("Missing columns"));
        assert!(validation.errors[0].contains("Plano de Contas"));
        assert!(validation.errors[0].contains("Competência"));
    }

    #[test]
    fn test_extra_columns_are_only_a_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("222.xlsx");
        let mut headers: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        headers.push("Coluna Extra");
        write_company_file(&path, &headers, true);

        let validation = validate_company_file(&path);
        assert!(validation.valid);
        assert!(validation.warnings.iter().any(|w| w.contains("Coluna Extra")));
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("333.xlsx");
        write_company_file(&path, &REQUIRED_COLUMNS, false);

        let validation = validate_company_file(&path);
        assert!(!validation.valid);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("no data rows")));
    }

    #[test]
    fn test_unreadable_file_is_invalid() {
        let dir = tempdir().unwrap();
        let validation = validate_company_file(&dir.path().join("missing.xlsx"));
        assert!(!validation.valid);
        assert!(validation.errors[0].contains("Could not read file"));
    }

    #[test]
    fn test_validate_batch_checks_references() {
        let dir = tempdir().unwrap();
        let report = validate_batch(dir.path(), &[]);
        assert_eq!(report.missing_references.len(), 2);
        assert!(!report.all_valid());
    }

    #[test]
    fn test_discover_company_files_filters_digit_stems() {
        let dir = tempdir().unwrap();
        write_company_file(&dir.path().join("26888098000159.xlsx"), &["Registro"], true);
        write_company_file(&dir.path().join("12345678000190.xlsx"), &["Registro"], true);
        write_company_file(&dir.path().join(CHART_OF_ACCOUNTS_FILE), &["Conta"], true);
        write_company_file(&dir.path().join(COST_CENTERS_FILE), &["Centro"], true);
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let tax_ids = discover_company_files(dir.path()).unwrap();
        assert_eq!(
            tax_ids,
            vec!["12345678000190".to_string(), "26888098000159".to_string()]
        );
    }
}
