use clap::{Parser, Subcommand};
use financial_statement_builder::{
    discover_company_files, read_company_roster, validate_batch, Result, StatementProcessor,
};
use log::error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "financial-statement-builder",
    version,
    about = "Generates monthly DRE and DFC statements per company from ledger spreadsheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the DRE/DFC workbook for every company in the roster.
    Process {
        /// Directory with PlanoDeContas.xlsx, CentroDeCustos.xlsx and the
        /// per-company data files
        #[arg(long)]
        input_dir: PathBuf,
        /// Directory where the DRE_DFC_<CNPJ>.xlsx files are written
        #[arg(long)]
        output_dir: PathBuf,
        /// Two-column CSV roster (CNPJ, Nome)
        #[arg(long)]
        roster: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Check that required files and columns are present, without generating
    /// statements.
    Validate {
        /// Directory with the reference and company data files
        #[arg(long)]
        input_dir: PathBuf,
        /// Roster CSV; when omitted, every numeric-named .xlsx in the input
        /// directory is checked
        #[arg(long)]
        roster: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input_dir,
            output_dir,
            roster,
            yes,
        } => run_process(&input_dir, &output_dir, &roster, yes),
        Commands::Validate { input_dir, roster } => run_validate(&input_dir, roster.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_process(
    input_dir: &std::path::Path,
    output_dir: &std::path::Path,
    roster: &std::path::Path,
    yes: bool,
) -> Result<ExitCode> {
    let jobs = read_company_roster(roster)?;
    if jobs.is_empty() {
        println!("No companies found in {}", roster.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} companies to process:", jobs.len());
    for job in &jobs {
        println!("  - {} ({})", job.display_name, job.tax_id);
    }

    if !yes && !confirm("Continue with processing? [y/N]: ")? {
        println!("Processing cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let processor = StatementProcessor::new(input_dir, output_dir)?;
    let report = processor.process_batch(&jobs);
    report.log_summary();

    println!();
    println!("Succeeded: {}/{}", report.completed.len(), report.total());
    for done in &report.completed {
        println!("  {} -> {}", done.job.display_name, done.output_path.display());
    }
    if !report.failed.is_empty() {
        println!("Failed: {}/{}", report.failed.len(), report.total());
        for failed in &report.failed {
            println!(
                "  {} ({}): {}",
                failed.job.display_name, failed.job.tax_id, failed.error
            );
        }
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_validate(input_dir: &std::path::Path, roster: Option<&std::path::Path>) -> Result<ExitCode> {
    let tax_ids: Vec<String> = match roster {
        Some(path) => read_company_roster(path)?
            .into_iter()
            .map(|job| job.tax_id)
            .collect(),
        None => discover_company_files(input_dir)?,
    };

    if tax_ids.is_empty() {
        println!("No company files found in {}", input_dir.display());
        return Ok(ExitCode::FAILURE);
    }

    let report = validate_batch(input_dir, &tax_ids);

    for file in &report.missing_references {
        println!("MISSING reference file: {file}");
    }
    for result in &report.results {
        println!(
            "{} {}",
            if result.valid { "PASS" } else { "FAIL" },
            result.file_name
        );
        for line in &result.info {
            println!("    info: {line}");
        }
        for line in &result.warnings {
            println!("    warning: {line}");
        }
        for line in &result.errors {
            println!("    error: {line}");
        }
    }

    println!();
    println!("Valid: {}/{}", report.valid_count(), report.results.len());
    println!("Invalid: {}/{}", report.invalid_count(), report.results.len());

    Ok(if report.all_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    ))
}
