//! Contract and feature data model
//!
//! Bureau exports are loosely typed: the same field can arrive as a string,
//! a number, `null`, or not at all. Everything is normalized once into
//! [`TextField`] at ingestion so the engine only ever asks one question of a
//! field: is it present?

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Optional bureau text value.
///
/// Absent, `null` and `""` all count as missing. Scalars that arrive as JSON
/// numbers or booleans keep their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextField(Option<String>);

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }

    /// The single missingness rule shared by every feature
    pub fn is_present(&self) -> bool {
        self.present().is_some()
    }

    /// The value, if present
    pub fn present(&self) -> Option<&str> {
        self.0.as_deref().filter(|s| !s.is_empty())
    }

    /// Lenient conversion from an arbitrary JSON value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self(Some(s.clone())),
            Value::Number(n) => Self(Some(n.to_string())),
            Value::Bool(b) => Self(Some(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => Self(None),
        }
    }
}

impl<'de> Deserialize<'de> for TextField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

impl From<&str> for TextField {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TextField {
    fn from(value: String) -> Self {
        Self(Some(value))
    }
}

impl From<Option<String>> for TextField {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or(""))
    }
}

/// One historical credit-bureau entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractRecord {
    /// Bureau contract identifier, carried for traceability only
    pub contract_id: TextField,
    /// Issuer code
    pub bank: TextField,
    /// Secondary amount; only its presence matters
    pub summa: TextField,
    /// Disbursed amount as decimal text
    pub loan_summa: TextField,
    /// Date the claim was filed (`DD.MM.YYYY` or `YYYY-MM-DD`)
    pub claim_date: TextField,
    /// Claim identifier; presence marks the contract as a claim
    pub claim_id: TextField,
    /// Date the contract was opened (`DD.MM.YYYY` or `YYYY-MM-DD`)
    pub contract_date: TextField,
}

impl ContractRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contract_id(mut self, value: impl Into<String>) -> Self {
        self.contract_id = TextField::new(value);
        self
    }

    pub fn with_bank(mut self, value: impl Into<String>) -> Self {
        self.bank = TextField::new(value);
        self
    }

    pub fn with_summa(mut self, value: impl Into<String>) -> Self {
        self.summa = TextField::new(value);
        self
    }

    pub fn with_loan_summa(mut self, value: impl Into<String>) -> Self {
        self.loan_summa = TextField::new(value);
        self
    }

    pub fn with_claim_date(mut self, value: impl Into<String>) -> Self {
        self.claim_date = TextField::new(value);
        self
    }

    pub fn with_claim_id(mut self, value: impl Into<String>) -> Self {
        self.claim_id = TextField::new(value);
        self
    }

    pub fn with_contract_date(mut self, value: impl Into<String>) -> Self {
        self.contract_date = TextField::new(value);
        self
    }

    /// Whether this contract represents a claim
    pub fn is_claim(&self) -> bool {
        self.claim_id.is_present()
    }
}

/// Out-of-domain codes used in place of a missing feature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// No bureau history whatsoever
    NoHistory,
    /// History exists but the specific signal is absent
    SignalAbsent,
}

impl Sentinel {
    pub const fn as_i64(self) -> i64 {
        match self {
            Sentinel::NoHistory => -1,
            Sentinel::SignalAbsent => -3,
        }
    }

    pub const fn as_f64(self) -> f64 {
        self.as_i64() as f64
    }

    /// Classify a raw feature value
    pub fn from_value(value: f64) -> Option<Self> {
        if value == Sentinel::NoHistory.as_f64() {
            Some(Sentinel::NoHistory)
        } else if value == Sentinel::SignalAbsent.as_f64() {
            Some(Sentinel::SignalAbsent)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::NoHistory => "no_history",
            Sentinel::SignalAbsent => "signal_absent",
        }
    }
}

/// Names of the derived features, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    TotClaimCntL180d,
    DisbBankLoanWoTbc,
    DaySinlastloan,
}

impl FeatureName {
    pub const ALL: [FeatureName; 3] = [
        FeatureName::TotClaimCntL180d,
        FeatureName::DisbBankLoanWoTbc,
        FeatureName::DaySinlastloan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureName::TotClaimCntL180d => "tot_claim_cnt_l180d",
            FeatureName::DisbBankLoanWoTbc => "disb_bank_loan_wo_tbc",
            FeatureName::DaySinlastloan => "day_sinlastloan",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three features derived for one applicant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Claims filed within the trailing 180 days, or `-3`
    pub tot_claim_cnt_l180d: i64,
    /// Disbursed exposure excluding TBC banks, or `-1` / `-3`
    pub disb_bank_loan_wo_tbc: f64,
    /// Days since the most recent loan-like contract, or `-1` / `-3`
    pub day_sinlastloan: i64,
}

impl FeatureRecord {
    /// Value of a feature as a float, for reporting
    pub fn value(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::TotClaimCntL180d => self.tot_claim_cnt_l180d as f64,
            FeatureName::DisbBankLoanWoTbc => self.disb_bank_loan_wo_tbc,
            FeatureName::DaySinlastloan => self.day_sinlastloan as f64,
        }
    }

    /// Sentinel carried by a feature, if any
    pub fn sentinel(&self, name: FeatureName) -> Option<Sentinel> {
        Sentinel::from_value(self.value(name))
    }
}
