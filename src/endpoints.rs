//! The endpoint URIs served by the dashboard.

/// The root route which redirects to the records page.
pub const ROOT: &str = "/";
/// The page for browsing records in a table.
pub const RECORDS_VIEW: &str = "/records";
/// The route for choosing which record type a records page shows.
pub const RECORDS_SELECT: &str = "/records/select";
/// The route for sorting, filtering and paging a records table.
pub const RECORDS_COMMAND: &str = "/records/command";
/// The page for choosing which kind of record to create.
pub const NEW_RECORD_VIEW: &str = "/new";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for creating a new account.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page for creating a new future prediction.
pub const NEW_FUTURE_VIEW: &str = "/future/new";
/// The page listing imported bank statement lines.
pub const BANK_STATEMENTS_VIEW: &str = "/bank-statements";

/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to create accounts.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route to create future predictions.
pub const FUTURE_API: &str = "/api/future";
/// The route to upload an ICICI bank statement.
pub const UPLOAD_STATEMENT_API: &str = "/api/bank-statements/upload";
/// The route to reconcile statement lines against transactions.
pub const RECONCILE_API: &str = "/api/bank-statements/reconcile";
/// The route to send payment reminders.
pub const NOTIFICATIONS_API: &str = "/api/notifications";
