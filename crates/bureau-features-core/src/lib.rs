//! Bureau Features Core
//!
//! Derives three credit-risk signals from an applicant's credit-bureau
//! contract history:
//!
//! - `tot_claim_cnt_l180d`: claims filed in the 180 days before the application
//! - `disb_bank_loan_wo_tbc`: disbursed loan exposure, excluding TBC issuers
//! - `day_sinlastloan`: days since the most recent loan-like contract
//!
//! Missing signals are encoded as sentinels (`-1` for no bureau history,
//! `-3` for history without the signal) so a downstream model never sees a
//! null.
//!
//! ## Architecture
//!
//! 1. **Model** (`model`): `ContractRecord`, `TextField`, `FeatureRecord`.
//! 2. **Dates** (`dates`): contract date and reference timestamp parsing.
//! 3. **Engine** (`engine`): the pure feature computation.
//! 4. **Ingest** (`ingest`): JSON list / JSON-string payload normalization.
//!
//! The engine performs no I/O and holds no state; it is safe to call from
//! any number of threads.
//!
//! ## Example
//!
//! ```rust
//! use bureau_features_core::{contracts_from_json_text, FeatureEngine};
//!
//! let contracts = contracts_from_json_text(
//!     r#"[{"bank": "003", "summa": "500000000", "loan_summa": "0",
//!          "claim_date": "13.02.2020", "claim_id": "609965",
//!          "contract_date": "17.02.2020"}]"#,
//! );
//! let features = FeatureEngine::new()
//!     .calculate_from_text("2024-02-12T19:24:29", &contracts)
//!     .unwrap();
//!
//! assert_eq!(features.tot_claim_cnt_l180d, -3);
//! assert_eq!(features.disb_bank_loan_wo_tbc, 0.0);
//! ```

pub mod dates;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod model;

pub use dates::{days_between, parse_contract_date, parse_reference_timestamp};
pub use engine::{FeatureEngine, CLAIM_WINDOW_DAYS, EXCLUDED_BANKS};
pub use error::{FeatureError, Result};
pub use ingest::{contracts_from_json_text, contracts_from_value, ContractsPayload};
pub use model::{ContractRecord, FeatureName, FeatureRecord, Sentinel, TextField};
