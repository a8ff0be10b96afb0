// Top-up Pipeline
// Drives load -> validate -> top-up -> report for one run

use crate::error::ServiceResult;
use crate::loader::DatasetLoader;
use crate::reporter::ReportRenderer;
use crate::topup::{apply_top_ups, CompanyTopUp};
use crate::validator::{UserValidator, ValidationOutcome};

use std::path::{Path, PathBuf};

/// Default report file name, relative to the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

/// Configuration for a single pipeline run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub users_path: PathBuf,
    pub companies_path: PathBuf,
    /// Report destination (default: `output.txt`)
    pub output_path: PathBuf,
}

impl RunConfig {
    pub fn new(users_path: impl Into<PathBuf>, companies_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            companies_path: companies_path.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }

    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }
}

/// A rendered report and the data behind it
#[derive(Debug, Clone)]
pub struct Report {
    pub companies: Vec<CompanyTopUp>,
    pub validation: ValidationOutcome,
    pub text: String,
}

impl Report {
    /// Number of users listed across all companies
    pub fn listed_users(&self) -> usize {
        self.companies.iter().map(CompanyTopUp::user_count).sum()
    }

    /// Tokens actually credited across all companies
    pub fn credited_total(&self) -> f64 {
        self.companies.iter().map(CompanyTopUp::credited_total).sum()
    }
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The report was produced
    Report(Report),
    /// One of the input arrays was empty
    NoInputData,
    /// Every user record was rejected
    NoValidUsers,
}

/// Run the pipeline up to rendering, without writing anything
pub fn prepare(config: &RunConfig) -> ServiceResult<RunOutcome> {
    let users = DatasetLoader::load_users(&config.users_path)?;
    let companies = DatasetLoader::load_companies(&config.companies_path)?;
    tracing::debug!(
        users = users.len(),
        companies = companies.len(),
        "datasets loaded"
    );

    if users.is_empty() || companies.is_empty() {
        return Ok(RunOutcome::NoInputData);
    }

    let validation = UserValidator::validate(users, &companies);
    if !validation.has_valid_users() {
        return Ok(RunOutcome::NoValidUsers);
    }

    // Only validated users are grouped; rejected records never reach the
    // report. The top-up works on its own copy so `validation` keeps the
    // pre-top-up balances.
    let results = apply_top_ups(companies, validation.valid.clone());

    let text = ReportRenderer::render(&results);
    Ok(RunOutcome::Report(Report {
        companies: results,
        validation,
        text,
    }))
}

/// Run the pipeline and write the report to `config.output_path`
///
/// Nothing is written when the run ends early.
pub fn run(config: &RunConfig) -> ServiceResult<RunOutcome> {
    let outcome = prepare(config)?;
    if let RunOutcome::Report(report) = &outcome {
        write_report(&config.output_path, report)?;
    }
    Ok(outcome)
}

fn write_report(path: &Path, report: &Report) -> ServiceResult<()> {
    ReportRenderer::write(path, &report.text)
}
