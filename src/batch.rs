use crate::aggregate::aggregate_by_account_month;
use crate::error::{Result, StatementError};
use crate::normalize::normalize_records;
use crate::pivot::{pivot_statement, PivotedStatement};
use crate::reference::ReferenceData;
use crate::render::write_statements;
use crate::schema::{CompanyJob, StatementKind, TransactionRecord};
use crate::workbook::read_table;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Roster rows shipped with the template carry this prefix instead of a real
/// tax id and are skipped.
const PLACEHOLDER_PREFIX: &str = "CNPJ_";

#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub job: CompanyJob,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FailedJob {
    pub job: CompanyJob,
    pub error: String,
}

/// Per-job outcomes of a batch run. Every submitted job lands in exactly one
/// of the two lists.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<CompletedJob>,
    pub failed: Vec<FailedJob>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn log_summary(&self) {
        info!(
            "Batch finished: {}/{} succeeded, {}/{} failed",
            self.completed.len(),
            self.total(),
            self.failed.len(),
            self.total()
        );
        for done in &self.completed {
            info!(
                "  {} -> {}",
                done.job.display_name,
                done.output_path.display()
            );
        }
        for failed in &self.failed {
            info!(
                "  {} ({}): {}",
                failed.job.display_name, failed.job.tax_id, failed.error
            );
        }
    }
}

/// Runs the statement pipeline for companies against one input directory.
///
/// Construction loads the shared reference tables, so a processor that exists
/// is always ready to run jobs; the references are only ever borrowed after
/// that.
#[derive(Debug)]
pub struct StatementProcessor {
    input_dir: PathBuf,
    output_dir: PathBuf,
    references: ReferenceData,
}

impl StatementProcessor {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();

        let references = ReferenceData::load(&input_dir)?;
        fs::create_dir_all(&output_dir)?;

        Ok(Self {
            input_dir,
            output_dir,
            references,
        })
    }

    pub fn references(&self) -> &ReferenceData {
        &self.references
    }

    /// Full pipeline for one company: read, normalize, aggregate under both
    /// regimes, pivot, render. Returns the written output path.
    pub fn process_company(&self, job: &CompanyJob) -> Result<PathBuf> {
        info!("Processing: {} ({})", job.display_name, job.tax_id);

        let file_name = format!("{}.xlsx", job.tax_id);
        let table = read_table(&self.input_dir.join(&file_name))?;
        info!("Loaded {} raw rows for {}", table.len(), job.tax_id);

        let records = normalize_records(&table, &file_name)?;

        let dre = build_statement_for(&records, StatementKind::Accrual);
        let dfc = build_statement_for(&records, StatementKind::Cash);

        let output_path = self.output_dir.join(format!("DRE_DFC_{}.xlsx", job.tax_id));
        write_statements(&output_path, &job.display_name, &dre, &dfc)?;
        info!(
            "Statements written: DRE {} accounts, DFC {} accounts",
            dre.rows.len(),
            dfc.rows.len()
        );

        Ok(output_path)
    }

    /// Processes the jobs sequentially. A failure on one company is recorded
    /// and processing continues with the next; failures never abort the batch.
    pub fn process_batch(&self, jobs: &[CompanyJob]) -> BatchReport {
        info!("Batch processing {} companies", jobs.len());

        let mut report = BatchReport::default();
        for job in jobs {
            match self.process_company(job) {
                Ok(output_path) => report.completed.push(CompletedJob {
                    job: job.clone(),
                    output_path,
                }),
                Err(err) => {
                    error!(
                        "Failed to process {} ({}): {err}",
                        job.display_name, job.tax_id
                    );
                    report.failed.push(FailedJob {
                        job: job.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        report
    }
}

fn build_statement_for(records: &[TransactionRecord], kind: StatementKind) -> PivotedStatement {
    info!("Building {} ({})", kind.sheet_name(), kind.title());
    pivot_statement(&aggregate_by_account_month(records, kind), kind)
}

/// Reads the company roster CSV. The file must have `CNPJ` and `Nome`
/// columns; rows whose tax id is a template placeholder are excluded.
pub fn read_company_roster(path: &Path) -> Result<Vec<CompanyJob>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let tax_index = headers
        .iter()
        .position(|header| header == "CNPJ")
        .ok_or(StatementError::InvalidRoster)?;
    let name_index = headers
        .iter()
        .position(|header| header == "Nome")
        .ok_or(StatementError::InvalidRoster)?;

    let mut jobs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let tax_id = record.get(tax_index).unwrap_or("").trim();
        let display_name = record.get(name_index).unwrap_or("").trim();
        if tax_id.is_empty() || tax_id.starts_with(PLACEHOLDER_PREFIX) {
            continue;
        }
        jobs.push(CompanyJob {
            tax_id: tax_id.to_string(),
            display_name: display_name.to_string(),
        });
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_roster_filters_placeholders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empresas.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "CNPJ,Nome").unwrap();
        writeln!(file, "26888098000159,GRUPO VOLPE - MATRIZ").unwrap();
        writeln!(file, "CNPJ_EMPRESA_2,EMPRESA 2").unwrap();
        writeln!(file, "12345678000190,EMPRESA 3").unwrap();
        drop(file);

        let jobs = read_company_roster(&path).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].tax_id, "26888098000159");
        assert_eq!(jobs[0].display_name, "GRUPO VOLPE - MATRIZ");
        assert_eq!(jobs[1].tax_id, "12345678000190");
    }

    #[test]
    fn test_roster_without_expected_columns_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empresas.csv");
        fs::write(&path, "Id,Name\n1,Empresa\n").unwrap();

        let err = read_company_roster(&path).unwrap_err();
        assert!(matches!(err, StatementError::InvalidRoster));
    }

    #[test]
    fn test_roster_skips_rows_without_tax_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empresas.csv");
        fs::write(&path, "CNPJ,Nome\n,Sem CNPJ\n111,Com CNPJ\n").unwrap();

        let jobs = read_company_roster(&path).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].tax_id, "111");
    }

    #[test]
    fn test_processor_requires_references() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out");
        let err = StatementProcessor::new(dir.path(), &output).unwrap_err();
        assert!(matches!(err, StatementError::MissingReferenceFile(_)));
    }
}
