use serde::{Deserialize, Serialize};

use crate::records::{
    AccountType, PaymentMode,
    wire::{decimal, optional_decimal},
};

/// A loan, card, chit or bank account tracked by the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    /// The server assigned serial number.
    #[serde(rename = "SLNo")]
    pub sl_no: i64,
    pub account_name: String,
    #[serde(rename = "Type")]
    pub account_type: AccountType,
    #[serde(rename = "AccID")]
    pub acc_id: String,
    #[serde(with = "decimal")]
    pub balance: f64,
    /// The annual interest rate as a percentage.
    #[serde(with = "decimal")]
    pub int_rate: f64,
    /// Stored by the backend as free text, usually `YYYY-MM-DD`.
    pub next_due_date: String,
    pub bank: PaymentMode,
    /// The loan tenure in months.
    #[serde(default)]
    pub tenure: Option<i64>,
    #[serde(rename = "EMIAmt", default, with = "optional_decimal")]
    pub emi_amt: Option<f64>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// The payload for creating an [Account].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountCreate {
    pub account_name: String,
    #[serde(rename = "Type")]
    pub account_type: AccountType,
    #[serde(rename = "AccID")]
    pub acc_id: String,
    #[serde(with = "decimal")]
    pub balance: f64,
    #[serde(with = "decimal")]
    pub int_rate: f64,
    pub next_due_date: String,
    pub bank: PaymentMode,
    pub tenure: Option<i64>,
    #[serde(rename = "EMIAmt", with = "optional_decimal")]
    pub emi_amt: Option<f64>,
    pub comments: Option<String>,
}

/// A partial update of an [Account]. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(rename = "AccID", skip_serializing_if = "Option::is_none")]
    pub acc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<PaymentMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure: Option<i64>,
    #[serde(rename = "EMIAmt", skip_serializing_if = "Option::is_none")]
    pub emi_amt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}
