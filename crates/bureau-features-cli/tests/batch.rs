//! Integration tests for CSV batch scoring and the dataset report

use bureau_features_cli::{
    batch::{read_rows, score_rows},
    run_batch, DatasetSummary,
};
use bureau_features_core::FeatureEngine;
use std::fs;
use tempfile::TempDir;

const DATA: &str = r#"id,application_date,contracts
2925210,2024-02-12 19:24:29.135000+00:00,"[{""contract_id"": ""522530"", ""bank"": ""003"", ""summa"": ""500000000"", ""loan_summa"": ""0"", ""claim_date"": ""13.02.2020"", ""claim_id"": ""609965"", ""contract_date"": ""17.02.2020""}, {""contract_id"": ""35163"", ""bank"": ""053"", ""summa"": ""510000000"", ""loan_summa"": ""0"", ""claim_date"": ""15.12.2020"", ""claim_id"": ""35163"", ""contract_date"": ""21.12.2020""}]"
2925211,2024-02-12 19:24:29.135000+00:00,
2925212,not a date,[]
2925213,2024-02-12 19:24:29.135000+00:00,"[{""bank"": ""LIZ"", ""loan_summa"": ""1000"", ""contract_date"": ""01.01.2024"", ""summa"": ""1000""}, {""bank"": ""001"", ""loan_summa"": ""250.5"", ""contract_date"": ""2023-12-01"", ""claim_date"": ""2024-01-15"", ""claim_id"": ""9""}]"
"#;

fn write_input(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("data.csv");
    fs::write(&path, DATA).unwrap();
    path
}

#[test]
fn test_batch_writes_feature_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("feature_results.csv");

    let report = run_batch(&FeatureEngine::new(), &input, &output).unwrap();
    assert_eq!(report.rows, 4);
    assert_eq!(report.scored, 3);
    assert!(report.has_skips());
    assert_eq!(report.skipped[0].row, 3);
    assert_eq!(report.skipped[0].id.as_deref(), Some("2925212"));

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec![
            "id",
            "application_date",
            "tot_claim_cnt_l180d",
            "disb_bank_loan_wo_tbc",
            "day_sinlastloan"
        ]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);

    assert_eq!(&records[0][0], "2925210");
    assert_eq!(&records[0][2], "-3");
    assert_eq!(records[0][3].parse::<f64>().unwrap(), 0.0);
    assert_eq!(&records[0][4], "1148");

    assert_eq!(&records[1][0], "2925211");
    assert_eq!(&records[1][2], "-3");
    assert_eq!(records[1][3].parse::<f64>().unwrap(), -1.0);
    assert_eq!(&records[1][4], "-1");

    // LIZ excluded from exposure but still the latest loan-like contract
    assert_eq!(&records[2][0], "2925213");
    assert_eq!(&records[2][2], "1");
    assert_eq!(records[2][3].parse::<f64>().unwrap(), 250.5);
    assert_eq!(&records[2][4], "42");
}

#[test]
fn test_batch_missing_input_is_file_error() {
    let dir = TempDir::new().unwrap();
    let err = run_batch(
        &FeatureEngine::new(),
        &dir.path().join("missing.csv"),
        &dir.path().join("out.csv"),
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), bureau_features_cli::ExitCode::FileError);
}

#[test]
fn test_summary_over_dataset() {
    let set = read_rows(DATA.as_bytes()).unwrap();
    let outcome = score_rows(&FeatureEngine::new(), &set.rows);
    let summary = DatasetSummary::build(&set.rows, &outcome, set.skipped.len());

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.rows_without_contracts, 1);
    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(summary.contracts.total_contracts, 4);
    assert!(summary.contracts.banks.contains("LIZ"));
    assert!(summary.contracts.fields.contains("loan_summa"));

    let claims = &summary.features[0];
    assert_eq!(claims.count, 3);
    assert_eq!(claims.sentinel_count, 2);
    assert_eq!(claims.max, Some(1.0));
}

#[test]
fn test_batch_with_every_row_skipped_still_writes_header() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("data.csv");
    fs::write(&input, "id,application_date,contracts\n1,not a date,[]\n").unwrap();
    let output = dir.path().join("feature_results.csv");

    let report = run_batch(&FeatureEngine::new(), &input, &output).unwrap();
    assert_eq!(report.scored, 0);
    assert_eq!(report.skipped.len(), 1);

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(
        text,
        "id,application_date,tot_claim_cnt_l180d,disb_bank_loan_wo_tbc,day_sinlastloan\n"
    );
}
