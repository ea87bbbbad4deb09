//! Output formatting for the feature CLI
//!
//! JSON and YAML render the serde form of a result; the table form is a
//! colored, human-readable layout with sentinel values highlighted.

use bureau_features_core::{FeatureName, FeatureRecord, TextField};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use crate::batch::BatchReport;
use crate::error::{CliError, Result};
use crate::report::DatasetSummary;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Features for one applicant, as printed by `compute`
#[derive(Debug, Clone, Serialize)]
pub struct FeatureOutput {
    pub id: TextField,
    pub application_date: String,
    #[serde(flatten)]
    pub features: FeatureRecord,
}

/// Results that know how to lay themselves out as a table
pub trait TableView: Serialize {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Render a result in the requested format to stdout
pub fn render<T: TableView>(value: &T, format: OutputFormat) -> Result<()> {
    let mut stdout = io::stdout();
    render_to(value, format, &mut stdout)
}

/// Render a result in the requested format to `out`
pub fn render_to<T: TableView>(value: &T, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| CliError::SerializationError(e.to_string()))?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)?;
            write!(out, "{}", yaml)?;
        }
        OutputFormat::Table => value.write_table(out)?,
    }
    Ok(())
}

fn header(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.cyan().bold())?;
    writeln!(out, "{}", "=".repeat(60))?;
    Ok(())
}

fn feature_value(features: &FeatureRecord, name: FeatureName) -> String {
    let text = match name {
        FeatureName::DisbBankLoanWoTbc => format!("{}", features.disb_bank_loan_wo_tbc),
        _ => format!("{}", features.value(name) as i64),
    };
    match features.sentinel(name) {
        Some(sentinel) => format!("{} ({})", text.yellow(), sentinel.as_str().dimmed()),
        None => text.green().to_string(),
    }
}

fn optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

impl TableView for FeatureOutput {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Bureau Features")?;
        writeln!(out, "  {:<24} {}", "id".bold(), self.id)?;
        writeln!(out, "  {:<24} {}", "application_date".bold(), self.application_date)?;
        writeln!(out, "{}", "-".repeat(60))?;
        for name in FeatureName::ALL {
            writeln!(out, "  {:<24} {}", name.as_str(), feature_value(&self.features, name))?;
        }
        writeln!(out)
    }
}

impl TableView for BatchReport {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Batch Results")?;
        writeln!(out, "  {:<12} {}", "Input:".bold(), self.input.display())?;
        writeln!(out, "  {:<12} {}", "Output:".bold(), self.output.display())?;
        writeln!(out, "  {:<12} {}", "Rows:".bold(), self.rows)?;
        writeln!(out, "  {:<12} {}", "Scored:".bold(), self.scored.to_string().green())?;

        let skipped = self.skipped.len().to_string();
        if self.has_skips() {
            writeln!(out, "  {:<12} {}", "Skipped:".bold(), skipped.yellow())?;
            for row in &self.skipped {
                let id = row.id.as_deref().unwrap_or("?");
                writeln!(out, "    row {} (id {}): {}", row.row, id, row.reason.dimmed())?;
            }
        } else {
            writeln!(out, "  {:<12} {}", "Skipped:".bold(), skipped)?;
        }
        writeln!(out, "  {:<12} {}ms", "Duration:".bold(), self.duration_ms)?;
        writeln!(out)
    }
}

impl TableView for DatasetSummary {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Data Analysis Report")?;
        writeln!(out, "  {:<24} {}", "Rows:".bold(), self.rows)?;
        writeln!(out, "  {:<24} {}", "Rows without contracts:".bold(), self.rows_without_contracts)?;
        writeln!(out, "  {:<24} {}", "Skipped rows:".bold(), self.skipped_rows)?;
        writeln!(out, "  {:<24} {}", "Total contracts:".bold(), self.contracts.total_contracts)?;

        let profile = &self.contracts;
        if profile.total_contracts > 0 {
            let fields: Vec<&str> = profile.fields.iter().map(String::as_str).collect();
            let banks: Vec<&str> = profile.banks.iter().map(String::as_str).collect();
            writeln!(out)?;
            writeln!(out, "  {}", "Contract fields".bold())?;
            writeln!(out, "    {}", fields.join(", "))?;
            writeln!(out, "  {}", "Unique banks".bold())?;
            writeln!(out, "    {}", banks.join(", "))?;
            writeln!(out, "  {}", "Sample claim dates".bold())?;
            writeln!(out, "    {}", profile.sample_claim_dates.join(", "))?;
            writeln!(out, "  {}", "Sample contract dates".bold())?;
            writeln!(out, "    {}", profile.sample_contract_dates.join(", "))?;
        }

        header(out, "Feature Statistics")?;
        writeln!(
            out,
            "  {:<24} {:>12} {:>12} {:>14} {:>14} {:>9}",
            "feature", "mean", "median", "min", "max", "sentinel"
        )?;
        writeln!(out, "{}", "-".repeat(92))?;
        for stats in &self.features {
            writeln!(
                out,
                "  {:<24} {:>12} {:>12} {:>14} {:>14} {:>9}",
                stats.feature.as_str(),
                optional(stats.mean),
                optional(stats.median),
                optional(stats.min),
                optional(stats.max),
                stats.sentinel_count
            )?;
        }
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureOutput {
        FeatureOutput {
            id: "app-1".into(),
            application_date: "2024-02-12T19:24:29".to_string(),
            features: FeatureRecord {
                tot_claim_cnt_l180d: -3,
                disb_bank_loan_wo_tbc: 0.0,
                day_sinlastloan: 1148,
            },
        }
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_render_json_is_flat() {
        let mut buffer = Vec::new();
        render_to(&sample(), OutputFormat::Json, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["id"], "app-1");
        assert_eq!(value["tot_claim_cnt_l180d"], -3);
        assert_eq!(value["day_sinlastloan"], 1148);
    }

    #[test]
    fn test_render_yaml() {
        let mut buffer = Vec::new();
        render_to(&sample(), OutputFormat::Yaml, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("day_sinlastloan: 1148"));
    }

    #[test]
    fn test_render_table_lists_every_feature() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        render_to(&sample(), OutputFormat::Table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        for name in FeatureName::ALL {
            assert!(text.contains(name.as_str()));
        }
        assert!(text.contains("-3 (signal_absent)"));
    }
}
