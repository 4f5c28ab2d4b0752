//! The columns shown for each record type.

use std::cmp::Ordering;

use crate::{
    format::{format_amount, format_cell, format_date, format_rate},
    records::{
        Account, AccountType, BankStatementLine, FuturePrediction, RecordSet, RecordType, Transaction,
        wire::parse_iso_date,
    },
    table::{CellValue, Column, TablePage, TableState, engine},
};

fn amount_cell(value: &CellValue) -> String {
    format_amount(value.as_number())
}

fn due_date_cell(value: &CellValue) -> String {
    match value {
        CellValue::Text(text) => format_date(text),
        other => format_cell(other),
    }
}

fn rate_cell(value: &CellValue) -> String {
    format_rate(value.as_number())
}

/// Account types sort in the order they are offered on the account form,
/// which groups loans before cards and cash, rather than by their codes.
fn by_account_type(left: &Account, right: &Account) -> Ordering {
    let rank = |account: &Account| {
        AccountType::ALL
            .iter()
            .position(|account_type| *account_type == account.account_type)
    };

    rank(left).cmp(&rank(right))
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_owned())
}

fn optional_text(value: &Option<String>) -> CellValue {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => CellValue::Text(text.to_owned()),
        _ => CellValue::Null,
    }
}

pub fn transaction_columns() -> Vec<Column<Transaction>> {
    vec![
        Column::new("TrNo", "Tr No", |t: &Transaction| {
            CellValue::Number(t.tr_no as f64)
        }),
        Column::new("Date", "Date", |t: &Transaction| CellValue::Date(t.date)),
        Column::new("Description", "Description", |t: &Transaction| {
            text(&t.description)
        })
        .truncated(),
        Column::new("Amount", "Amount", |t: &Transaction| {
            CellValue::Number(t.amount)
        })
        .formatted(amount_cell)
        .summarized(),
        Column::new("PaymentMode", "Payment Mode", |t: &Transaction| {
            text(t.payment_mode.as_str())
        }),
        Column::new("AccID", "Account ID", |t: &Transaction| text(&t.acc_id)),
        Column::new("Department", "Department", |t: &Transaction| {
            text(t.department.as_str())
        }),
        Column::new("Category", "Category", |t: &Transaction| {
            text(t.category.as_str())
        }),
        Column::new("Comments", "Comments", |t: &Transaction| {
            optional_text(&t.comments)
        })
        .truncated(),
        Column::new("ZohoMatch", "Zoho Match", |t: &Transaction| {
            CellValue::Bool(t.zoho_match)
        }),
    ]
}

pub fn account_columns() -> Vec<Column<Account>> {
    vec![
        Column::new("SLNo", "SL No", |a: &Account| CellValue::Number(a.sl_no as f64)),
        Column::new("AccountName", "Account Name", |a: &Account| {
            text(&a.account_name)
        }),
        Column::new("Type", "Type", |a: &Account| text(a.account_type.as_str()))
            .compared_by(by_account_type),
        Column::new("AccID", "Account ID", |a: &Account| text(&a.acc_id)),
        Column::new("Balance", "Balance", |a: &Account| CellValue::Number(a.balance))
            .formatted(amount_cell)
            .summarized(),
        Column::new("IntRate", "Interest Rate", |a: &Account| {
            CellValue::Number(a.int_rate)
        })
        .formatted(rate_cell),
        // Free text on the backend; sorted as a date when it parses as one.
        Column::new("NextDueDate", "Next Due Date", |a: &Account| {
            match parse_iso_date(&a.next_due_date) {
                Some(date) => CellValue::Date(date),
                None => optional_text(&Some(a.next_due_date.clone())),
            }
        })
        .formatted(due_date_cell),
        Column::new("Bank", "Bank", |a: &Account| text(a.bank.as_str())),
        Column::new("Tenure", "Tenure", |a: &Account| {
            CellValue::from(a.tenure.map(|months| months as f64))
        }),
        Column::new("EMIAmt", "EMI Amount", |a: &Account| CellValue::from(a.emi_amt))
            .formatted(amount_cell)
            .summarized(),
        Column::new("Comments", "Comments", |a: &Account| optional_text(&a.comments))
            .truncated(),
    ]
}

pub fn future_columns() -> Vec<Column<FuturePrediction>> {
    vec![
        Column::new("TrNo", "Tr No", |f: &FuturePrediction| {
            CellValue::Number(f.tr_no as f64)
        }),
        Column::new("Date", "Date", |f: &FuturePrediction| CellValue::Date(f.date)),
        Column::new("Description", "Description", |f: &FuturePrediction| {
            text(&f.description)
        })
        .truncated(),
        Column::new("Amount", "Amount", |f: &FuturePrediction| {
            CellValue::Number(f.amount)
        })
        .formatted(amount_cell)
        .summarized(),
        Column::new("PaymentMode", "Payment Mode", |f: &FuturePrediction| {
            text(f.payment_mode.as_str())
        }),
        Column::new("AccID", "Account ID", |f: &FuturePrediction| text(&f.acc_id)),
        Column::new("Department", "Department", |f: &FuturePrediction| {
            text(f.department.as_str())
        }),
        Column::new("Category", "Category", |f: &FuturePrediction| {
            text(f.category.as_str())
        }),
        Column::new("Comments", "Comments", |f: &FuturePrediction| {
            optional_text(&f.comments)
        })
        .truncated(),
        Column::new("Paid", "Paid", |f: &FuturePrediction| CellValue::Bool(f.paid)),
    ]
}

pub fn statement_columns() -> Vec<Column<BankStatementLine>> {
    vec![
        Column::new("transaction_date", "Date", |l: &BankStatementLine| {
            CellValue::Date(l.transaction_date)
        }),
        Column::new("value_date", "Value Date", |l: &BankStatementLine| {
            CellValue::Date(l.value_date)
        }),
        Column::new("description", "Description", |l: &BankStatementLine| {
            text(&l.description)
        })
        .truncated(),
        Column::new("ref_no", "Ref No", |l: &BankStatementLine| text(&l.ref_no)),
        Column::new("debit", "Debit", |l: &BankStatementLine| CellValue::from(l.debit))
            .formatted(amount_cell)
            .summarized(),
        Column::new("credit", "Credit", |l: &BankStatementLine| {
            CellValue::from(l.credit)
        })
        .formatted(amount_cell)
        .summarized(),
        Column::new("balance", "Balance", |l: &BankStatementLine| {
            CellValue::Number(l.balance)
        })
        .formatted(amount_cell),
        Column::new("reconciled", "Reconciled", |l: &BankStatementLine| {
            CellValue::Bool(l.reconciled)
        }),
    ]
}

/// The keys of the columns shown for `record_type`.
pub fn column_keys(record_type: RecordType) -> Vec<&'static str> {
    match record_type {
        RecordType::Transactions => transaction_columns().iter().map(|c| c.key).collect(),
        RecordType::Accounts => account_columns().iter().map(|c| c.key).collect(),
        RecordType::Future => future_columns().iter().map(|c| c.key).collect(),
    }
}

/// Render the page of `records` selected by `state`.
pub fn render_record_set(records: &RecordSet, state: &TableState) -> TablePage {
    match records {
        RecordSet::Transactions(records) => {
            engine::render_page(records, &transaction_columns(), state)
        }
        RecordSet::Accounts(records) => engine::render_page(records, &account_columns(), state),
        RecordSet::Future(records) => engine::render_page(records, &future_columns(), state),
    }
}

/// The number of `records` matching `filter`.
pub fn filtered_row_count(records: &RecordSet, filter: &str) -> usize {
    match records {
        RecordSet::Transactions(records) => {
            engine::filter_rows(records, &transaction_columns(), filter).len()
        }
        RecordSet::Accounts(records) => {
            engine::filter_rows(records, &account_columns(), filter).len()
        }
        RecordSet::Future(records) => {
            engine::filter_rows(records, &future_columns(), filter).len()
        }
    }
}
