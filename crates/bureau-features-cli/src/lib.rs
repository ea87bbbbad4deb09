//! Bureau Features CLI
//!
//! Offline tooling around the credit-bureau feature engine:
//!
//! - **batch**: score a CSV export (`id, application_date, contracts`) into a
//!   feature CSV, skipping rows with an unusable application date
//! - **compute**: features for a single applicant from a contracts JSON file
//! - **summary**: dataset report with contract profile and feature statistics
//!
//! ## Example
//!
//! ```rust,no_run
//! use bureau_features_cli::{run_cli, FeaturesCli};
//! use clap::Parser;
//!
//! fn main() {
//!     let cli = FeaturesCli::parse();
//!     let exit_code = run_cli(cli);
//!     std::process::exit(exit_code.into());
//! }
//! ```

pub mod batch;
pub mod cli;
pub mod error;
pub mod report;

pub use batch::{read_rows, run_batch, score_rows, write_results, BatchReport, InputRow};
pub use cli::{ExitCode, FeatureCommands, FeaturesCli, OutputFormat};
pub use error::{CliError, Result};
pub use report::{ContractProfile, DatasetSummary, FeatureStats};

/// Run the CLI and map any error to its exit code
pub fn run_cli(cli: FeaturesCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
