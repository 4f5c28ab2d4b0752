use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    endpoints,
    forms::{
        RecordForm,
        fields::{Field, amount_input, number_input, select_input, text_area, text_input},
        validation::{
            FieldErrors, optional_decimal, optional_tenure, optional_text, required_choice,
            required_date, required_decimal, required_text,
        },
    },
    records::{
        Account, AccountCreate, AccountType, PaymentMode, RecordType, wire::format_iso_date,
    },
};

/// The raw input of the new account form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountForm {
    pub account_name: Option<String>,
    #[serde(rename = "Type")]
    pub account_type: Option<String>,
    #[serde(rename = "AccID")]
    pub acc_id: Option<String>,
    pub balance: Option<String>,
    pub int_rate: Option<String>,
    pub next_due_date: Option<String>,
    pub bank: Option<String>,
    pub tenure: Option<String>,
    #[serde(rename = "EMIAmt")]
    pub emi_amt: Option<String>,
    pub comments: Option<String>,
}

impl RecordForm for AccountForm {
    type Resource = Account;

    const RECORD_TYPE: RecordType = RecordType::Accounts;
    const ENDPOINT: &'static str = endpoints::ACCOUNTS_API;

    fn with_defaults(today: Date) -> Self {
        Self {
            next_due_date: Some(format_iso_date(today)),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<AccountCreate, FieldErrors> {
        let mut errors = FieldErrors::default();

        let account_name = errors.check("AccountName", required_text(self.account_name.as_deref()));
        let account_type = errors.check(
            "Type",
            required_choice::<AccountType>(self.account_type.as_deref()),
        );
        let acc_id = errors.check("AccID", required_text(self.acc_id.as_deref()));
        let balance = errors.check("Balance", required_decimal(self.balance.as_deref()));
        let int_rate = errors.check("IntRate", required_decimal(self.int_rate.as_deref()));
        let next_due_date = errors.check(
            "NextDueDate",
            required_date(self.next_due_date.as_deref()),
        );
        let bank = errors.check("Bank", required_choice::<PaymentMode>(self.bank.as_deref()));
        let tenure = errors.check("Tenure", optional_tenure(self.tenure.as_deref()));
        let emi_amt = errors.check("EMIAmt", optional_decimal(self.emi_amt.as_deref()));
        let comments = errors.check("Comments", optional_text(self.comments.as_deref()));

        let (
            Some(account_name),
            Some(account_type),
            Some(acc_id),
            Some(balance),
            Some(int_rate),
            Some(next_due_date),
            Some(bank),
            Some(tenure),
            Some(emi_amt),
            Some(comments),
        ) = (
            account_name,
            account_type,
            acc_id,
            balance,
            int_rate,
            next_due_date,
            bank,
            tenure,
            emi_amt,
            comments,
        )
        else {
            return Err(errors);
        };

        Ok(AccountCreate {
            account_name,
            account_type,
            acc_id,
            balance,
            int_rate,
            next_due_date: format_iso_date(next_due_date),
            bank,
            tenure,
            emi_amt,
            comments,
        })
    }

    fn fields(&self, errors: &FieldErrors) -> Markup {
        let account_types: Vec<&str> = AccountType::ALL.iter().map(|t| t.as_str()).collect();
        let banks: Vec<&str> = PaymentMode::ALL.iter().map(|mode| mode.as_str()).collect();

        html! {
            (text_input(Field {
                name: "AccountName",
                label: "Account Name",
                value: self.account_name.as_deref().unwrap_or_default(),
                error: errors.get("AccountName"),
                required: true,
            }, "text"))

            (select_input(Field {
                name: "Type",
                label: "Account Type",
                value: self.account_type.as_deref().unwrap_or_default(),
                error: errors.get("Type"),
                required: true,
            }, &account_types))

            (text_input(Field {
                name: "AccID",
                label: "Account ID",
                value: self.acc_id.as_deref().unwrap_or_default(),
                error: errors.get("AccID"),
                required: true,
            }, "text"))

            (amount_input(Field {
                name: "Balance",
                label: "Balance",
                value: self.balance.as_deref().unwrap_or_default(),
                error: errors.get("Balance"),
                required: true,
            }))

            (number_input(Field {
                name: "IntRate",
                label: "Interest Rate (%)",
                value: self.int_rate.as_deref().unwrap_or_default(),
                error: errors.get("IntRate"),
                required: true,
            }, "0.01"))

            (text_input(Field {
                name: "NextDueDate",
                label: "Next Due Date",
                value: self.next_due_date.as_deref().unwrap_or_default(),
                error: errors.get("NextDueDate"),
                required: true,
            }, "date"))

            (select_input(Field {
                name: "Bank",
                label: "Bank",
                value: self.bank.as_deref().unwrap_or_default(),
                error: errors.get("Bank"),
                required: true,
            }, &banks))

            (number_input(Field {
                name: "Tenure",
                label: "Tenure (months)",
                value: self.tenure.as_deref().unwrap_or_default(),
                error: errors.get("Tenure"),
                required: false,
            }, "1"))

            (amount_input(Field {
                name: "EMIAmt",
                label: "EMI Amount",
                value: self.emi_amt.as_deref().unwrap_or_default(),
                error: errors.get("EMIAmt"),
                required: false,
            }))

            (text_area(Field {
                name: "Comments",
                label: "Comments",
                value: self.comments.as_deref().unwrap_or_default(),
                error: errors.get("Comments"),
                required: false,
            }))
        }
    }
}
