//! Lines imported from ICICI bank statements and the backend's replies to
//! statement uploads and reconciliation runs.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::records::wire::{decimal, iso_date, optional_decimal};

/// One line of an imported bank statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankStatementLine {
    pub id: i64,
    #[serde(with = "iso_date")]
    pub transaction_date: Date,
    #[serde(with = "iso_date")]
    pub value_date: Date,
    pub description: String,
    pub ref_no: String,
    #[serde(default, with = "optional_decimal")]
    pub debit: Option<f64>,
    #[serde(default, with = "optional_decimal")]
    pub credit: Option<f64>,
    #[serde(with = "decimal")]
    pub balance: f64,
    #[serde(default)]
    pub reconciled: bool,
    /// The ledger transaction this line was matched with.
    #[serde(default)]
    pub transaction_id: Option<i64>,
}

/// The result of uploading a statement file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankStatementUploadResponse {
    pub total_transactions: u64,
    pub new_transactions: u64,
    pub duplicate_transactions: u64,
    pub message: String,
}

/// The result of matching statement lines against ledger transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResponse {
    pub total_transactions: u64,
    pub reconciled_transactions: u64,
    pub unreconciled_transactions: u64,
    pub message: String,
}
