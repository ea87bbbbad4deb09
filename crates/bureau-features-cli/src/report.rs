//! Dataset report for a bureau export
//!
//! Profiles the raw contract payloads (field names, bank codes, date samples)
//! and summarizes the distribution of each feature over the scored rows.

use bureau_features_core::{FeatureName, TextField};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::batch::{BatchOutcome, InputRow};

/// Number of sample dates kept per date field
pub const DATE_SAMPLE_SIZE: usize = 5;

/// Distribution of one feature over a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStats {
    pub feature: FeatureName,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Values below zero, i.e. sentinels
    pub sentinel_count: usize,
}

impl FeatureStats {
    /// Compute statistics over raw feature values; NaN values are ignored
    pub fn from_values(feature: FeatureName, values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let sentinel_count = sorted.iter().filter(|v| **v < 0.0).count();

        if count == 0 {
            return Self {
                feature,
                count,
                mean: None,
                median: None,
                min: None,
                max: None,
                sentinel_count,
            };
        }

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };

        Self {
            feature,
            count,
            mean: Some(mean),
            median: Some(median),
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            sentinel_count,
        }
    }
}

/// Shape of the contract payloads in a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractProfile {
    pub total_contracts: usize,
    /// Every key seen on any contract object
    pub fields: BTreeSet<String>,
    pub banks: BTreeSet<String>,
    pub sample_claim_dates: Vec<String>,
    pub sample_contract_dates: Vec<String>,
}

impl ContractProfile {
    /// Profile the contracts cells of `rows`
    ///
    /// Undecodable cells and non-object entries are ignored.
    pub fn from_rows(rows: &[InputRow]) -> Self {
        let mut profile = Self::default();

        for text in rows.iter().filter_map(|r| r.contracts.as_deref()) {
            if text.trim().is_empty() {
                continue;
            }
            let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) else {
                continue;
            };
            for item in &items {
                if let Value::Object(map) = item {
                    profile.add(map);
                }
            }
        }

        profile
    }

    fn add(&mut self, contract: &serde_json::Map<String, Value>) {
        self.total_contracts += 1;
        self.fields.extend(contract.keys().cloned());

        let field = |key: &str| contract.get(key).map(TextField::from_json).unwrap_or_default();

        if let Some(bank) = field("bank").present() {
            self.banks.insert(bank.to_string());
        }
        if self.sample_claim_dates.len() < DATE_SAMPLE_SIZE {
            if let Some(date) = field("claim_date").present() {
                self.sample_claim_dates.push(date.to_string());
            }
        }
        if self.sample_contract_dates.len() < DATE_SAMPLE_SIZE {
            if let Some(date) = field("contract_date").present() {
                self.sample_contract_dates.push(date.to_string());
            }
        }
    }
}

/// Full dataset report
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub rows_without_contracts: usize,
    pub skipped_rows: usize,
    pub contracts: ContractProfile,
    pub features: Vec<FeatureStats>,
}

impl DatasetSummary {
    pub fn build(rows: &[InputRow], outcome: &BatchOutcome, undecodable: usize) -> Self {
        let features = FeatureName::ALL
            .iter()
            .map(|&name| {
                let values: Vec<f64> = outcome
                    .results
                    .iter()
                    .map(|r| r.features.value(name))
                    .collect();
                FeatureStats::from_values(name, &values)
            })
            .collect();

        Self {
            rows: rows.len() + undecodable,
            rows_without_contracts: rows.iter().filter(|r| !r.has_contracts()).count(),
            skipped_rows: outcome.skipped.len() + undecodable,
            contracts: ContractProfile::from_rows(rows),
            features,
        }
    }
}
