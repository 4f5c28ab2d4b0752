use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    endpoints,
    forms::{
        RecordForm,
        fields::{Field, amount_input, checkbox_input, select_input, text_area, text_input},
        validation::{
            FieldErrors, checkbox, optional_text, required_choice, required_date,
            required_decimal, required_text,
        },
    },
    records::{
        Category, Department, PaymentMode, RecordType, Transaction, TransactionCreate,
        wire::format_iso_date,
    },
};

/// The raw input of the new transaction form.
///
/// Inputs are named after the backend's fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionForm {
    pub date: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub payment_mode: Option<String>,
    #[serde(rename = "AccID")]
    pub acc_id: Option<String>,
    pub department: Option<String>,
    pub comments: Option<String>,
    pub category: Option<String>,
    pub zoho_match: Option<String>,
}

impl RecordForm for TransactionForm {
    type Resource = Transaction;

    const RECORD_TYPE: RecordType = RecordType::Transactions;
    const ENDPOINT: &'static str = endpoints::TRANSACTIONS_API;

    fn with_defaults(today: Date) -> Self {
        Self {
            date: Some(format_iso_date(today)),
            payment_mode: Some(PaymentMode::Cash.to_string()),
            department: Some(Department::Serendipity.to_string()),
            category: Some(Category::Income.to_string()),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<TransactionCreate, FieldErrors> {
        let mut errors = FieldErrors::default();

        let date = errors.check("Date", required_date(self.date.as_deref()));
        let description = errors.check("Description", required_text(self.description.as_deref()));
        let amount = errors.check("Amount", required_decimal(self.amount.as_deref()));
        let payment_mode = errors.check(
            "PaymentMode",
            required_choice::<PaymentMode>(self.payment_mode.as_deref()),
        );
        let acc_id = errors.check("AccID", required_text(self.acc_id.as_deref()));
        let department = errors.check(
            "Department",
            required_choice::<Department>(self.department.as_deref()),
        );
        let comments = errors.check("Comments", optional_text(self.comments.as_deref()));
        let category = errors.check(
            "Category",
            required_choice::<Category>(self.category.as_deref()),
        );

        let (
            Some(date),
            Some(description),
            Some(amount),
            Some(payment_mode),
            Some(acc_id),
            Some(department),
            Some(comments),
            Some(category),
        ) = (
            date,
            description,
            amount,
            payment_mode,
            acc_id,
            department,
            comments,
            category,
        )
        else {
            return Err(errors);
        };

        Ok(TransactionCreate {
            date,
            description,
            amount,
            payment_mode,
            acc_id,
            department,
            comments,
            category,
            zoho_match: checkbox(self.zoho_match.as_deref()),
        })
    }

    fn fields(&self, errors: &FieldErrors) -> Markup {
        let payment_modes: Vec<&str> = PaymentMode::ALL.iter().map(|mode| mode.as_str()).collect();
        let departments: Vec<&str> = Department::ALL.iter().map(|d| d.as_str()).collect();
        let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();

        html! {
            (text_input(Field {
                name: "Date",
                label: "Date",
                value: self.date.as_deref().unwrap_or_default(),
                error: errors.get("Date"),
                required: true,
            }, "date"))

            (text_input(Field {
                name: "Description",
                label: "Description",
                value: self.description.as_deref().unwrap_or_default(),
                error: errors.get("Description"),
                required: true,
            }, "text"))

            (amount_input(Field {
                name: "Amount",
                label: "Amount",
                value: self.amount.as_deref().unwrap_or_default(),
                error: errors.get("Amount"),
                required: true,
            }))
            p class="-mt-3 text-xs text-gray-500 dark:text-gray-400" { "Use a negative amount for an expense." }

            (select_input(Field {
                name: "PaymentMode",
                label: "Payment Mode",
                value: self.payment_mode.as_deref().unwrap_or_default(),
                error: errors.get("PaymentMode"),
                required: true,
            }, &payment_modes))

            (text_input(Field {
                name: "AccID",
                label: "Account ID",
                value: self.acc_id.as_deref().unwrap_or_default(),
                error: errors.get("AccID"),
                required: true,
            }, "text"))

            (select_input(Field {
                name: "Department",
                label: "Department",
                value: self.department.as_deref().unwrap_or_default(),
                error: errors.get("Department"),
                required: true,
            }, &departments))

            (select_input(Field {
                name: "Category",
                label: "Category",
                value: self.category.as_deref().unwrap_or_default(),
                error: errors.get("Category"),
                required: true,
            }, &categories))

            (text_area(Field {
                name: "Comments",
                label: "Comments",
                value: self.comments.as_deref().unwrap_or_default(),
                error: errors.get("Comments"),
                required: false,
            }))

            (checkbox_input("ZohoMatch", "Matched in Zoho", checkbox(self.zoho_match.as_deref())))
        }
    }
}
