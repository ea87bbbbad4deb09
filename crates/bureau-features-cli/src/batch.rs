//! CSV batch scoring
//!
//! Input columns: `id, application_date, contracts` where `contracts` is a
//! JSON-encoded list. Output columns: `id, application_date` followed by the
//! three features.
//!
//! One bad row never aborts a batch. Records that do not decode and rows whose
//! `application_date` the engine rejects are logged at `warn` and reported as
//! skipped; only I/O failures stop the run.

use bureau_features_core::{contracts_from_json_text, FeatureEngine, FeatureRecord};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{CliError, Result};

/// One input row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputRow {
    /// 1-based data row number (the header is not counted)
    #[serde(skip)]
    pub row: usize,
    pub id: String,
    pub application_date: String,
    #[serde(default)]
    pub contracts: Option<String>,
}

impl InputRow {
    /// Whether the contracts cell is absent or blank
    pub fn has_contracts(&self) -> bool {
        self.contracts
            .as_deref()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    }
}

/// A scored row
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub id: String,
    pub application_date: String,
    pub features: FeatureRecord,
}

/// A row left out of the results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reason: String,
}

/// Output columns, written even when no row scores
pub const OUTPUT_HEADER: [&str; 5] = [
    "id",
    "application_date",
    "tot_claim_cnt_l180d",
    "disb_bank_loan_wo_tbc",
    "day_sinlastloan",
];

/// Flat CSV form of a scored row
#[derive(Serialize)]
struct OutputRow<'a> {
    id: &'a str,
    application_date: &'a str,
    tot_claim_cnt_l180d: i64,
    disb_bank_loan_wo_tbc: f64,
    day_sinlastloan: i64,
}

impl<'a> From<&'a ScoredRow> for OutputRow<'a> {
    fn from(row: &'a ScoredRow) -> Self {
        Self {
            id: &row.id,
            application_date: &row.application_date,
            tot_claim_cnt_l180d: row.features.tot_claim_cnt_l180d,
            disb_bank_loan_wo_tbc: row.features.disb_bank_loan_wo_tbc,
            day_sinlastloan: row.features.day_sinlastloan,
        }
    }
}

/// Rows read from an input CSV
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub rows: Vec<InputRow>,
    /// Records that could not be decoded
    pub skipped: Vec<SkippedRow>,
}

/// Result of scoring a row set
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub results: Vec<ScoredRow>,
    pub skipped: Vec<SkippedRow>,
}

/// Summary of a completed batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Data rows seen, including skipped ones
    pub rows: usize,
    pub scored: usize,
    pub skipped: Vec<SkippedRow>,
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Read input rows from CSV
pub fn read_rows<R: Read>(reader: R) -> Result<RowSet> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut set = RowSet::default();

    for (index, record) in rdr.deserialize::<InputRow>().enumerate() {
        let row = index + 1;
        match record {
            Ok(mut input) => {
                input.row = row;
                set.rows.push(input);
            }
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                tracing::warn!(row, error = %err, "Skipping undecodable CSV record");
                set.skipped.push(SkippedRow {
                    row,
                    id: None,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(set)
}

/// Score every row, skipping the ones with an unusable `application_date`
pub fn score_rows(engine: &FeatureEngine, rows: &[InputRow]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for input in rows {
        let contracts = input
            .contracts
            .as_deref()
            .map(contracts_from_json_text)
            .unwrap_or_default();

        match engine.calculate_from_text(&input.application_date, &contracts) {
            Ok(features) => outcome.results.push(ScoredRow {
                id: input.id.clone(),
                application_date: input.application_date.clone(),
                features,
            }),
            Err(err) => {
                tracing::warn!(
                    row = input.row,
                    id = %input.id,
                    error = %err,
                    "Skipping row"
                );
                outcome.skipped.push(SkippedRow {
                    row: input.row,
                    id: Some(input.id.clone()),
                    reason: err.to_string(),
                });
            }
        }
    }

    outcome
}

/// Write scored rows as CSV
pub fn write_results<W: Write>(writer: W, results: &[ScoredRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(OUTPUT_HEADER)?;
    for row in results {
        wtr.serialize(OutputRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read `input`, score it and write the feature CSV to `output`
pub fn run_batch(engine: &FeatureEngine, input: &Path, output: &Path) -> Result<BatchReport> {
    let start = Instant::now();

    let file = File::open(input).map_err(|e| CliError::file(input, e))?;
    let set = read_rows(file)?;
    let rows = set.rows.len() + set.skipped.len();
    let mut outcome = score_rows(engine, &set.rows);

    let out = File::create(output).map_err(|e| CliError::file(output, e))?;
    write_results(out, &outcome.results)?;

    let mut skipped = set.skipped;
    skipped.append(&mut outcome.skipped);
    skipped.sort_by_key(|s| s.row);

    let report = BatchReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        rows,
        scored: outcome.results.len(),
        skipped,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        rows = report.rows,
        scored = report.scored,
        skipped = report.skipped.len(),
        "Batch complete"
    );

    Ok(report)
}
