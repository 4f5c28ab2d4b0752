//! The closed sets of values the backend accepts for payment modes,
//! departments, categories and account types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A string that does not name any member of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{value}\" is not a valid {kind}")]
pub struct UnknownVariant {
    /// The human readable name of the set, e.g. "payment mode".
    pub kind: &'static str,
    /// The rejected value.
    pub value: String,
}

/// Declares an enum whose members serialize to fixed wire spellings.
///
/// Each enum gets an `ALL` list in declaration order, `as_str`, [FromStr] and
/// [fmt::Display] using the wire spelling.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every member, in the order the backend lists them.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The spelling used by the backend.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_set! {
    /// The bank account, card or cash float a payment went through.
    PaymentMode, "payment mode" {
        Cash => "Cash",
        Credit => "Credit",
        Dollars => "Dollars",
        Icici090 => "ICICI_090",
        IciciCurrent => "ICICI_Current",
        IciciCc9003 => "ICICI_CC_9003",
        IciciCc1009 => "ICICI_CC_1009",
        Sbi => "SBI",
        Sbi3479 => "SBI_3479",
        Dbs => "DBS",
        Debit => "Debit",
    }
}

closed_set! {
    /// The business unit a record belongs to.
    Department, "department" {
        Serendipity => "Serendipity",
        DhoomStudios => "Dhoom Studios",
        Trademan => "Trademan",
    }
}

closed_set! {
    /// The bookkeeping category of a transaction or prediction.
    Category, "category" {
        Salaries => "Salaries",
        HandLoans => "Hand Loans",
        Maintenance => "Maintenance",
        Income => "Income",
        Emi => "EMI",
        Chits => "Chits",
    }
}

closed_set! {
    /// The kind of liability or asset an account tracks.
    AccountType, "account type" {
        /// Home loan.
        HomeLoan => "HL",
        Emi => "EMI",
        /// Hand loan given.
        HandLoanGiven => "HLG",
        CreditCard => "CC",
        Cash => "CAS",
        Chit => "Chit",
        Contra => "CON",
        Account => "ACC",
    }
}
