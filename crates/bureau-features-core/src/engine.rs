//! Feature engine
//!
//! Each feature is an independent, stateless reduction over the contract
//! list. Bad field values are skipped, never reported: the caller always gets
//! a complete [`FeatureRecord`], with sentinels standing in for absent
//! signals.
//!
//! Sentinel policy:
//! - `-1`: no contract carries a claim id, i.e. no bureau history at all
//! - `-3`: history exists but this particular signal is absent
//!
//! `tot_claim_cnt_l180d` only ever uses `-3`, including for an empty
//! contract list. Downstream models were trained on that encoding, so it
//! stays.

use chrono::NaiveDateTime;

use crate::dates::{days_between, parse_contract_date, parse_reference_timestamp};
use crate::error::Result;
use crate::model::{ContractRecord, FeatureRecord, Sentinel};

/// Trailing window for the claim count, inclusive on both ends
pub const CLAIM_WINDOW_DAYS: i64 = 180;

/// Issuer codes whose loans are left out of the exposure sum.
/// A missing bank code is excluded as well.
pub const EXCLUDED_BANKS: [&str; 4] = ["LIZ", "LOM", "MKO", "SUG"];

/// The credit-bureau feature engine
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngine;

impl FeatureEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute all three features relative to `reference`.
    ///
    /// Deterministic and side-effect free.
    pub fn calculate(&self, reference: NaiveDateTime, contracts: &[ContractRecord]) -> FeatureRecord {
        FeatureRecord {
            tot_claim_cnt_l180d: recent_claim_count(reference, contracts),
            disb_bank_loan_wo_tbc: disbursed_exposure(contracts),
            day_sinlastloan: days_since_last_loan(reference, contracts),
        }
    }

    /// Parse the reference timestamp, then compute.
    ///
    /// Fails only when the timestamp is missing or unparseable.
    pub fn calculate_from_text(
        &self,
        reference: &str,
        contracts: &[ContractRecord],
    ) -> Result<FeatureRecord> {
        let reference = parse_reference_timestamp(reference)?;
        Ok(self.calculate(reference, contracts))
    }
}

/// Claims filed in the trailing window, or `-3` when there are none.
pub fn recent_claim_count(reference: NaiveDateTime, contracts: &[ContractRecord]) -> i64 {
    let count = contracts
        .iter()
        .filter_map(|c| c.claim_date.present().and_then(parse_contract_date))
        .map(|claim_date| days_between(reference, claim_date))
        .filter(|days| (0..=CLAIM_WINDOW_DAYS).contains(days))
        .count() as i64;

    if count > 0 {
        count
    } else {
        Sentinel::SignalAbsent.as_i64()
    }
}

/// Sum of `loan_summa` over qualifying loans, or a fallback sentinel.
///
/// Only the presence of `contract_date` is checked here, not whether it
/// parses.
pub fn disbursed_exposure(contracts: &[ContractRecord]) -> f64 {
    let amounts: Vec<f64> = contracts
        .iter()
        .filter(|c| c.contract_date.is_present() && !is_excluded_bank(c))
        .filter_map(|c| c.loan_summa.present().and_then(parse_amount))
        .collect();

    if amounts.is_empty() {
        history_fallback(contracts).as_f64()
    } else {
        amounts.iter().sum()
    }
}

/// Days from the most recent loan-like contract to `reference`.
///
/// Not clamped: a contract dated after the reference yields a negative
/// value.
pub fn days_since_last_loan(reference: NaiveDateTime, contracts: &[ContractRecord]) -> i64 {
    let last_loan = contracts
        .iter()
        .filter(|c| c.summa.is_present())
        .filter_map(|c| c.contract_date.present().and_then(parse_contract_date))
        .max();

    match last_loan {
        Some(date) => days_between(reference, date),
        None => history_fallback(contracts).as_i64(),
    }
}

fn is_excluded_bank(contract: &ContractRecord) -> bool {
    match contract.bank.present() {
        Some(code) => EXCLUDED_BANKS.contains(&code),
        None => true,
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn history_fallback(contracts: &[ContractRecord]) -> Sentinel {
    if contracts.iter().any(ContractRecord::is_claim) {
        Sentinel::SignalAbsent
    } else {
        Sentinel::NoHistory
    }
}
