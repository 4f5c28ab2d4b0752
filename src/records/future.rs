use serde::{Deserialize, Serialize};
use time::Date;

use crate::records::{
    Category, Department, PaymentMode,
    wire::{decimal, iso_date, optional_iso_date},
};

/// A payment or receipt expected on a future date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuturePrediction {
    /// The server assigned number, shared with the transaction sequence.
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
    #[serde(default)]
    pub paid: bool,
}

/// The payload for creating a [FuturePrediction].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuturePredictionCreate {
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
    pub paid: bool,
}

/// A partial update of a [FuturePrediction]. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuturePredictionUpdate {
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
    pub paid: Option<bool>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::records::{
        Category, Department, FuturePrediction, FuturePredictionCreate, PaymentMode,
    };

    #[test]
    fn create_payload_uses_backend_field_names() {
        let payload = FuturePredictionCreate {
            date: date!(2024 - 06 - 01),
            description: "Chit instalment".to_owned(),
            amount: -10000.0,
            payment_mode: PaymentMode::Cash,
            acc_id: "CHIT-9".to_owned(),
            department: Department::Trademan,
            comments: None,
            category: Category::Chits,
            paid: false,
        };

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            json!({
                "Date": "2024-06-01",
                "Description": "Chit instalment",
                "Amount": -10000.0,
                "PaymentMode": "Cash",
                "AccID": "CHIT-9",
                "Department": "Trademan",
                "Comments": null,
                "Category": "Chits",
                "Paid": false
            })
        );
    }

    #[test]
    fn paid_defaults_to_false() {
        let value = json!({
            "TrNo": 1,
            "Date": "2024-06-01",
            "Description": "Chit instalment",
            "Amount": -10000,
            "PaymentMode": "Cash",
            "AccID": "CHIT-9",
            "Department": "Trademan",
            "Category": "Chits"
        });

        let prediction: FuturePrediction = serde_json::from_value(value).unwrap();

        assert!(!prediction.paid);
    }
}
