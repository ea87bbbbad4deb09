//! CLI module for the feature tools
//!
//! Command definitions live in `commands`, rendering in `output`.

pub mod commands;
pub mod output;

pub use commands::{FeatureCommands, FeaturesCli};
pub use output::{FeatureOutput, OutputFormat, TableView};

use crate::error::Result;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// Batch finished but some rows were skipped
    CompletedWithSkips = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: FeaturesCli) -> Result<ExitCode> {
    let quiet = cli.quiet;
    match cli.command {
        FeatureCommands::Batch {
            input,
            output,
            format,
        } => commands::execute_batch(input, output, format, quiet),
        FeatureCommands::Compute {
            application_date,
            contracts,
            id,
            format,
        } => commands::execute_compute(application_date, contracts, id, format),
        FeatureCommands::Summary { input, format } => commands::execute_summary(input, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::CompletedWithSkips), 2);
        assert_eq!(i32::from(ExitCode::InvalidInput), 3);
        assert_eq!(i32::from(ExitCode::FileError), 4);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }
}
