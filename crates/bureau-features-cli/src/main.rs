//! Bureau Features CLI
//!
//! # Usage
//!
//! ```bash
//! # Score a CSV export
//! bureau-features batch --input data.csv --output feature_results.csv
//!
//! # One applicant, contracts from a file or stdin
//! bureau-features compute --application-date 2024-02-12T19:24:29 --contracts contracts.json
//! cat contracts.json | bureau-features compute -a 2024-02-12 --format json
//!
//! # Dataset report
//! bureau-features summary --input data.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 2: Batch finished with skipped rows
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 10: Internal error

use bureau_features_cli::{run_cli, FeaturesCli};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    let cli = FeaturesCli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LevelFilter::from_level(cli.log_level()).into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
