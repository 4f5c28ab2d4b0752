use serde::{Deserialize, Serialize};
use time::Date;

use crate::records::{
    Category, Department, PaymentMode,
    wire::{decimal, iso_date, optional_iso_date},
};

/// A money movement recorded in the ledger.
///
/// Negative amounts are expenses, positive amounts are income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    /// The server assigned transaction number.
    pub tr_no: i64,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub description: String,
    #[serde(with = "decimal")]
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[serde(rename = "AccID")]
    pub acc_id: String,
    pub department: Department,
    #[serde(default)]
    pub comments: Option<String>,
    pub category: Category,
    /// Whether the transaction has been matched against the books.
    #[serde(default)]
    pub zoho_match: bool,
}

/// The payload for creating a [Transaction].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionCreate {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub description: String,
    #[serde(with = "decimal")]
    pub amount: f64,
    pub payment_mode: PaymentMode,
    #[serde(rename = "AccID")]
    pub acc_id: String,
    pub department: Department,
    pub comments: Option<String>,
    pub category: Category,
    pub zoho_match: bool,
}

/// A partial update of a [Transaction]. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionUpdate {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_iso_date::serialize"
    )]
    pub date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
    #[serde(rename = "AccID", skip_serializing_if = "Option::is_none")]
    pub acc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoho_match: Option<bool>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::records::{Category, Department, PaymentMode, Transaction, TransactionUpdate};

    #[test]
    fn decodes_backend_field_names() {
        let value = json!({
            "TrNo": 7,
            "Date": "2024-01-15",
            "Description": "Office rent",
            "Amount": "-25000.00",
            "PaymentMode": "ICICI_Current",
            "AccID": "ACC-001",
            "Department": "Serendipity",
            "Comments": null,
            "Category": "Maintenance",
            "ZohoMatch": true
        });

        let transaction: Transaction = serde_json::from_value(value).unwrap();

        assert_eq!(
            transaction,
            Transaction {
                tr_no: 7,
                date: date!(2024 - 01 - 15),
                description: "Office rent".to_owned(),
                amount: -25000.0,
                payment_mode: PaymentMode::IciciCurrent,
                acc_id: "ACC-001".to_owned(),
                department: Department::Serendipity,
                comments: None,
                category: Category::Maintenance,
                zoho_match: true,
            }
        );
    }

    #[test]
    fn rejects_unknown_payment_mode() {
        let value = json!({
            "TrNo": 7,
            "Date": "2024-01-15",
            "Description": "Office rent",
            "Amount": -25000,
            "PaymentMode": "Paypal",
            "AccID": "ACC-001",
            "Department": "Serendipity",
            "Category": "Maintenance",
            "ZohoMatch": false
        });

        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }

    #[test]
    fn update_only_sends_set_fields() {
        let update = TransactionUpdate {
            amount: Some(12.5),
            date: Some(date!(2024 - 02 - 01)),
            ..Default::default()
        };

        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json, json!({"Date": "2024-02-01", "Amount": 12.5}));
    }
}
