use crate::error::{Result, StatementError};
use crate::workbook::{read_table, Table};
use log::info;
use std::path::Path;

pub const CHART_OF_ACCOUNTS_FILE: &str = "PlanoDeContas.xlsx";
pub const COST_CENTERS_FILE: &str = "CentroDeCustos.xlsx";

/// Shared lookup tables, loaded once per batch and borrowed by every company
/// job. Nothing mutates these after loading, so they are safe to share across
/// threads without locking.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub chart_of_accounts: Table,
    pub cost_centers: Table,
}

impl ReferenceData {
    /// Loads both reference files from `input_dir`. Either file missing is
    /// fatal for the whole batch: no company can be processed without them.
    pub fn load(input_dir: &Path) -> Result<Self> {
        info!("Loading reference files...");

        let chart_of_accounts = load_reference(&input_dir.join(CHART_OF_ACCOUNTS_FILE))?;
        info!(
            "Chart of accounts loaded: {} accounts",
            chart_of_accounts.len()
        );

        let cost_centers = load_reference(&input_dir.join(COST_CENTERS_FILE))?;
        info!("Cost centers loaded: {} centers", cost_centers.len());

        Ok(Self {
            chart_of_accounts,
            cost_centers,
        })
    }
}

fn load_reference(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(StatementError::MissingReferenceFile(path.to_path_buf()));
    }
    read_table(path)
}
