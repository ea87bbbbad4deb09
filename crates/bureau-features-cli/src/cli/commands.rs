//! CLI command definitions for the feature CLI
//!
//! Batch scoring of CSV exports, one-off computation for a single applicant
//! and a dataset report.

use bureau_features_core::{ContractRecord, ContractsPayload, FeatureEngine};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::output::{render, FeatureOutput, OutputFormat};
use super::ExitCode;
use crate::batch::{read_rows, run_batch, score_rows};
use crate::error::{CliError, Result};
use crate::report::DatasetSummary;

/// Default output path for `batch`
pub const DEFAULT_OUTPUT: &str = "feature_results.csv";

/// Bureau features CLI
///
/// Compute credit-bureau features from contract histories.
#[derive(Parser, Debug)]
#[command(name = "bureau-features")]
#[command(about = "Bureau Features - Score credit-bureau contract histories", long_about = None)]
#[command(version)]
pub struct FeaturesCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: FeatureCommands,
}

impl FeaturesCli {
    /// Log level implied by `-v` / `-q`
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum FeatureCommands {
    /// Score every row of a CSV export
    ///
    /// Reads `id, application_date, contracts` and writes the features per
    /// row. Rows with an unusable application_date are skipped and reported.
    Batch {
        /// Input CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Output format for the run summary
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Compute features for one applicant
    ///
    /// Contracts are read from a JSON file, or from stdin when no file is
    /// given. Either a JSON list or a JSON-encoded string is accepted.
    Compute {
        /// Reference timestamp, e.g. 2024-02-12T19:24:29
        #[arg(short, long)]
        application_date: String,

        /// Path to the contracts JSON ("-" for stdin)
        #[arg(short, long)]
        contracts: Option<PathBuf>,

        /// Applicant identifier echoed in the output
        #[arg(long)]
        id: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Report on a CSV export: contract shapes and feature distributions
    Summary {
        /// Input CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Execute the batch command
pub fn execute_batch(
    input: PathBuf,
    output: PathBuf,
    format: Option<OutputFormat>,
    quiet: bool,
) -> Result<ExitCode> {
    let report = run_batch(&FeatureEngine::new(), &input, &output)?;

    if !quiet {
        render(&report, format.unwrap_or_default())?;
    }

    Ok(if report.has_skips() {
        ExitCode::CompletedWithSkips
    } else {
        ExitCode::Success
    })
}

/// Execute the compute command
pub fn execute_compute(
    application_date: String,
    contracts: Option<PathBuf>,
    id: Option<String>,
    format: Option<OutputFormat>,
) -> Result<ExitCode> {
    let text = match contracts.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| CliError::file(path, format!("failed to read contracts: {}", e)))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let output = compute_features(&application_date, &text, id)?;
    render(&output, format.unwrap_or_default())?;
    Ok(ExitCode::Success)
}

/// Execute the summary command
pub fn execute_summary(input: PathBuf, format: Option<OutputFormat>) -> Result<ExitCode> {
    let file = File::open(&input).map_err(|e| CliError::file(&input, e))?;
    let set = read_rows(file)?;
    let outcome = score_rows(&FeatureEngine::new(), &set.rows);
    let summary = DatasetSummary::build(&set.rows, &outcome, set.skipped.len());

    render(&summary, format.unwrap_or_default())?;
    Ok(ExitCode::Success)
}

/// Compute features from a reference timestamp and contracts JSON text
///
/// Blank text means no contracts. Text that is not JSON is rejected, unlike
/// the lenient HTTP and batch paths, since it was supplied by hand.
pub fn compute_features(
    application_date: &str,
    contracts_json: &str,
    id: Option<String>,
) -> Result<FeatureOutput> {
    let contracts: Vec<ContractRecord> = if contracts_json.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str::<ContractsPayload>(contracts_json)?.into_contracts()
    };

    let features = FeatureEngine::new().calculate_from_text(application_date, &contracts)?;
    tracing::debug!(contracts = contracts.len(), "Features calculated");

    Ok(FeatureOutput {
        id: id.into(),
        application_date: application_date.to_string(),
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        FeaturesCli::command().debug_assert();
    }

    #[test]
    fn test_parse_batch_defaults() {
        let cli = FeaturesCli::parse_from(["bureau-features", "batch", "--input", "data.csv"]);
        match cli.command {
            FeatureCommands::Batch { input, output, format } => {
                assert_eq!(input, PathBuf::from("data.csv"));
                assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT));
                assert_eq!(format, Some(OutputFormat::Table));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level() {
        let cli = FeaturesCli::parse_from(["bureau-features", "-vv", "summary", "-i", "x.csv"]);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);

        let cli = FeaturesCli::parse_from(["bureau-features", "-q", "summary", "-i", "x.csv"]);
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_compute_features_list() {
        let contracts = r#"[
            {"bank": "003", "summa": "500000000", "loan_summa": "0",
             "claim_date": "13.02.2020", "claim_id": "609965", "contract_date": "17.02.2020"},
            {"bank": "053", "summa": "510000000", "loan_summa": "0",
             "claim_date": "15.12.2020", "claim_id": "35163", "contract_date": "21.12.2020"}
        ]"#;
        let output =
            compute_features("2024-02-12T19:24:29", contracts, Some("a".to_string())).unwrap();

        assert_eq!(output.id.present(), Some("a"));
        assert_eq!(output.features.tot_claim_cnt_l180d, -3);
        assert_eq!(output.features.disb_bank_loan_wo_tbc, 0.0);
        assert_eq!(output.features.day_sinlastloan, 1148);
    }

    #[test]
    fn test_compute_features_encoded_string() {
        let encoded = serde_json::to_string(r#"[{"claim_id": "1"}]"#).unwrap();
        let output = compute_features("2024-02-12", &encoded, None).unwrap();
        assert_eq!(output.features.disb_bank_loan_wo_tbc, -3.0);
        assert!(!output.id.is_present());
    }

    #[test]
    fn test_compute_features_blank_contracts() {
        let output = compute_features("2024-02-12", "  \n", None).unwrap();
        assert_eq!(output.features.tot_claim_cnt_l180d, -3);
        assert_eq!(output.features.disb_bank_loan_wo_tbc, -1.0);
        assert_eq!(output.features.day_sinlastloan, -1);
    }

    #[test]
    fn test_compute_features_errors() {
        let err = compute_features("2024-02-12", "{not json", None).unwrap_err();
        assert!(matches!(err, CliError::ParseError(_)));

        let err = compute_features("", "[]", None).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert_eq!(err.exit_code(), ExitCode::InvalidInput);
    }
}
