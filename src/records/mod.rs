//! The record types kept by the backend and the payloads for creating and
//! updating them.

mod account;
mod enums;
mod future;
mod statement;
mod transaction;
pub(crate) mod wire;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use account::{Account, AccountCreate, AccountUpdate};
pub use enums::{AccountType, Category, Department, PaymentMode, UnknownVariant};
pub use future::{FuturePrediction, FuturePredictionCreate, FuturePredictionUpdate};
pub use statement::{BankStatementLine, BankStatementUploadResponse, ReconciliationResponse};
pub use transaction::{Transaction, TransactionCreate, TransactionUpdate};

/// The kinds of record that can be listed and created from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Transactions,
    Accounts,
    Future,
}

impl RecordType {
    /// All record types in the order they are offered to the user.
    pub const ALL: [RecordType; 3] = [
        RecordType::Transactions,
        RecordType::Accounts,
        RecordType::Future,
    ];

    /// The value used for this type in query strings and forms.
    pub fn as_query_value(self) -> &'static str {
        match self {
            RecordType::Transactions => "transactions",
            RecordType::Accounts => "accounts",
            RecordType::Future => "future",
        }
    }

    /// The heading shown to the user for a list of this type.
    pub fn label(self) -> &'static str {
        match self {
            RecordType::Transactions => "Transactions",
            RecordType::Accounts => "Accounts",
            RecordType::Future => "Future Predictions",
        }
    }

    /// The name of a single record of this type.
    pub fn singular(self) -> &'static str {
        match self {
            RecordType::Transactions => "Transaction",
            RecordType::Accounts => "Account",
            RecordType::Future => "Future prediction",
        }
    }

    /// The informational message shown when the backend has no records of this type.
    pub fn no_data_message(self) -> String {
        format!("No {} data available", self.as_query_value())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

/// A homogeneous list of records as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSet {
    Transactions(Vec<Transaction>),
    Accounts(Vec<Account>),
    Future(Vec<FuturePrediction>),
}

impl RecordSet {
    /// The type of the records in the set.
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordSet::Transactions(_) => RecordType::Transactions,
            RecordSet::Accounts(_) => RecordType::Accounts,
            RecordSet::Future(_) => RecordType::Future,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordSet::Transactions(records) => records.len(),
            RecordSet::Accounts(records) => records.len(),
            RecordSet::Future(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordSet, RecordType};

    #[test]
    fn no_data_message_names_the_type() {
        assert_eq!(
            RecordType::Transactions.no_data_message(),
            "No transactions data available"
        );
        assert_eq!(
            RecordType::Future.no_data_message(),
            "No future data available"
        );
    }

    #[test]
    fn record_type_round_trips_through_query_strings() {
        for record_type in RecordType::ALL {
            let query = serde_urlencoded::to_string([("type", record_type)]).unwrap();
            let parsed: Vec<(String, RecordType)> = serde_urlencoded::from_str(&query).unwrap();

            assert_eq!(query, format!("type={}", record_type.as_query_value()));
            assert_eq!(parsed[0].1, record_type);
        }
    }

    #[test]
    fn empty_record_set_reports_its_type() {
        let set = RecordSet::Accounts(Vec::new());

        assert!(set.is_empty());
        assert_eq!(set.record_type(), RecordType::Accounts);
    }
}
