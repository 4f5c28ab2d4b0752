//! Tracks which record type a table shows, the lifecycle of fetching it and
//! the table's sort, filter and paging state.
//!
//! Fetches are identified by a [FetchTicket]. Only the result for the most
//! recently issued ticket is applied, so a slow response for a record type the
//! user has since switched away from can never overwrite the newer one.

use std::sync::{Mutex, MutexGuard};

use crate::{
    Error,
    api::{ApiClient, ApiError},
    pagination::{PageSize, page_count},
    records::{RecordSet, RecordType},
    table::{TableCommand, TablePage, TableState, column_keys, filtered_row_count, render_record_set},
};

/// Somewhere records can be fetched from.
pub trait RecordSource {
    fn fetch(
        &self,
        record_type: RecordType,
    ) -> impl Future<Output = Result<RecordSet, ApiError>> + Send;
}

impl RecordSource for ApiClient {
    fn fetch(
        &self,
        record_type: RecordType,
    ) -> impl Future<Output = Result<RecordSet, ApiError>> + Send {
        self.list(record_type)
    }
}

/// Identifies one fetch started by [TableController::begin].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    id: u64,
    record_type: RecordType,
}

impl FetchTicket {
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }
}

/// Whether [TableController::finish] applied a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer fetch was started after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    /// No record type has been selected yet.
    #[default]
    Idle,
    Loading(RecordType),
    Loaded(RecordSet),
    /// The fetch succeeded but returned no records.
    NoData(RecordType),
    Failed {
        record_type: RecordType,
        message: String,
    },
}

/// The state behind one records table.
#[derive(Debug, Clone)]
pub struct TableController {
    load_state: LoadState,
    table: TableState,
    default_page_size: PageSize,
    latest_ticket: u64,
}

impl Default for TableController {
    fn default() -> Self {
        Self::new(PageSize::DEFAULT)
    }
}

impl TableController {
    pub fn new(default_page_size: PageSize) -> Self {
        Self {
            load_state: LoadState::Idle,
            table: TableState::new(default_page_size),
            default_page_size,
            latest_ticket: 0,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    /// The record type selected last, whether or not its data has arrived.
    pub fn record_type(&self) -> Option<RecordType> {
        match &self.load_state {
            LoadState::Idle => None,
            LoadState::Loading(record_type)
            | LoadState::NoData(record_type)
            | LoadState::Failed { record_type, .. } => Some(*record_type),
            LoadState::Loaded(records) => Some(records.record_type()),
        }
    }

    /// Start fetching `record_type`.
    ///
    /// Any previous data is discarded and the sort, filter, page and hidden
    /// columns are reset.
    pub fn begin(&mut self, record_type: RecordType) -> FetchTicket {
        self.latest_ticket += 1;
        self.load_state = LoadState::Loading(record_type);
        self.table = TableState::new(self.default_page_size);

        FetchTicket {
            id: self.latest_ticket,
            record_type,
        }
    }

    /// Apply the outcome of the fetch identified by `ticket`, unless a newer
    /// fetch has been started since.
    pub fn finish(&mut self, ticket: FetchTicket, result: Result<RecordSet, ApiError>) -> Applied {
        if ticket.id != self.latest_ticket {
            return Applied::Stale;
        }

        self.load_state = match result {
            Ok(records) if records.is_empty() => LoadState::NoData(ticket.record_type),
            Ok(records) => LoadState::Loaded(records),
            Err(error) => LoadState::Failed {
                record_type: ticket.record_type,
                message: error.to_string(),
            },
        };

        Applied::Current
    }

    /// Apply a table interaction to the loaded records.
    ///
    /// # Errors
    /// Returns [Error::TableNotLoaded] if there are no records to apply it to
    /// and [Error::UnknownColumn] if the command names a column the current
    /// record type does not have.
    pub fn apply(&mut self, command: TableCommand) -> Result<(), Error> {
        let LoadState::Loaded(records) = &self.load_state else {
            return Err(Error::TableNotLoaded);
        };

        if let TableCommand::Sort(column) | TableCommand::ToggleColumn(column) = &command {
            if !column_keys(records.record_type()).contains(&column.as_str()) {
                return Err(Error::UnknownColumn(column.clone()));
            }
        }

        let filtered = filtered_row_count(records, self.table.filter());
        let page_count = page_count(filtered, self.table.page_size());
        self.table.apply(command, page_count);

        Ok(())
    }

    /// The current page of the loaded records, if any.
    pub fn page(&self) -> Option<TablePage> {
        match &self.load_state {
            LoadState::Loaded(records) => Some(render_record_set(records, &self.table)),
            _ => None,
        }
    }
}

fn lock(controller: &Mutex<TableController>) -> Result<MutexGuard<'_, TableController>, Error> {
    controller.lock().map_err(|error| {
        tracing::error!("Could not acquire the table controller lock: {error}");
        Error::ViewLockError
    })
}

/// Fetch `record_type` from `source` into `controller`.
///
/// The lock is only held to start and to finish the fetch, never while
/// waiting on `source`, so a newer call can start while this one is in flight.
/// Fetch errors end up in the controller's [LoadState::Failed], not in the
/// returned result.
pub async fn load_records<S: RecordSource>(
    controller: &Mutex<TableController>,
    source: &S,
    record_type: RecordType,
) -> Result<Applied, Error> {
    let ticket = lock(controller)?.begin(record_type);

    let result = source.fetch(record_type).await;

    if let Err(error) = &result {
        tracing::error!("Could not fetch {record_type}: {error}");
    }

    let applied = lock(controller)?.finish(ticket, result);

    if applied == Applied::Stale {
        tracing::debug!("Discarding {record_type} fetched for a superseded request");
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use time::macros::date;

    use crate::{
        Error,
        api::ApiError,
        records::{
            Account, AccountType, Category, Department, PaymentMode, RecordSet, RecordType,
            Transaction,
        },
        table::TableCommand,
    };

    use super::{Applied, LoadState, RecordSource, TableController, load_records};

    fn transactions(count: i64) -> RecordSet {
        RecordSet::Transactions(
            (1..=count)
                .map(|tr_no| Transaction {
                    tr_no,
                    date: date!(2024 - 01 - 15),
                    description: format!("Transaction {tr_no}"),
                    amount: tr_no as f64,
                    payment_mode: PaymentMode::Cash,
                    acc_id: "ACC-1".to_owned(),
                    department: if tr_no % 2 == 0 {
                        Department::Serendipity
                    } else {
                        Department::Trademan
                    },
                    comments: None,
                    category: Category::Income,
                    zoho_match: false,
                })
                .collect(),
        )
    }

    fn accounts() -> RecordSet {
        RecordSet::Accounts(vec![Account {
            sl_no: 1,
            account_name: "Car loan".to_owned(),
            account_type: AccountType::Emi,
            acc_id: "EMI-1".to_owned(),
            balance: 1000.0,
            int_rate: 9.0,
            next_due_date: "2024-02-01".to_owned(),
            bank: PaymentMode::Sbi,
            tenure: Some(12),
            emi_amt: Some(100.0),
            comments: None,
        }])
    }

    #[test]
    fn starts_idle() {
        let controller = TableController::default();

        assert_eq!(controller.load_state(), &LoadState::Idle);
        assert_eq!(controller.record_type(), None);
        assert!(controller.page().is_none());
    }

    #[test]
    fn last_request_wins() {
        let mut controller = TableController::default();

        let first = controller.begin(RecordType::Transactions);
        let second = controller.begin(RecordType::Accounts);

        assert_eq!(controller.finish(second, Ok(accounts())), Applied::Current);
        assert_eq!(controller.finish(first, Ok(transactions(3))), Applied::Stale);
        assert_eq!(controller.load_state(), &LoadState::Loaded(accounts()));
    }

    #[test]
    fn empty_result_is_no_data() {
        let mut controller = TableController::default();

        let ticket = controller.begin(RecordType::Future);
        controller.finish(ticket, Ok(RecordSet::Future(Vec::new())));

        assert_eq!(controller.load_state(), &LoadState::NoData(RecordType::Future));
    }

    #[test]
    fn failure_keeps_api_message_and_clears_data() {
        let mut controller = TableController::default();
        let ticket = controller.begin(RecordType::Transactions);
        controller.finish(ticket, Ok(transactions(2)));

        let ticket = controller.begin(RecordType::Transactions);
        controller.finish(ticket, Err(ApiError::Network));

        assert_eq!(
            controller.load_state(),
            &LoadState::Failed {
                record_type: RecordType::Transactions,
                message: "network request failed".to_owned()
            }
        );
        assert!(controller.page().is_none());
    }

    #[test]
    fn begin_resets_table_state() {
        let mut controller = TableController::default();
        let ticket = controller.begin(RecordType::Transactions);
        controller.finish(ticket, Ok(transactions(30)));
        controller.apply(TableCommand::Sort("Amount".to_owned())).unwrap();
        controller.apply(TableCommand::NextPage).unwrap();
        controller.apply(TableCommand::ToggleColumn("Comments".to_owned())).unwrap();

        controller.begin(RecordType::Accounts);

        assert_eq!(controller.table().sort(), None);
        assert_eq!(controller.table().page_index(), 0);
        assert!(!controller.table().is_hidden("Comments"));
        assert_eq!(controller.load_state(), &LoadState::Loading(RecordType::Accounts));
    }

    #[test]
    fn navigation_uses_filtered_page_count() {
        let mut controller = TableController::default();
        let ticket = controller.begin(RecordType::Transactions);
        controller.finish(ticket, Ok(transactions(30)));

        // 15 Serendipity rows fit on two pages of ten.
        controller
            .apply(TableCommand::Filter("serendipity".to_owned()))
            .unwrap();
        controller.apply(TableCommand::LastPage).unwrap();

        let page = controller.page().unwrap();
        assert_eq!(page.filtered_rows, 15);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.rows.len(), 5);
    }

    #[test]
    fn rejects_commands_without_data_or_for_unknown_columns() {
        let mut controller = TableController::default();
        assert_eq!(
            controller.apply(TableCommand::NextPage),
            Err(Error::TableNotLoaded)
        );

        let ticket = controller.begin(RecordType::Accounts);
        controller.finish(ticket, Ok(accounts()));

        assert_eq!(
            controller.apply(TableCommand::Sort("ZohoMatch".to_owned())),
            Err(Error::UnknownColumn("ZohoMatch".to_owned()))
        );
    }

    struct SlowTransactions;

    impl RecordSource for SlowTransactions {
        fn fetch(
            &self,
            record_type: RecordType,
        ) -> impl Future<Output = Result<RecordSet, ApiError>> + Send {
            async move {
                match record_type {
                    RecordType::Transactions => {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(transactions(3))
                    }
                    RecordType::Accounts => Ok(accounts()),
                    RecordType::Future => Ok(RecordSet::Future(Vec::new())),
                }
            }
        }
    }

    #[tokio::test]
    async fn slow_stale_fetch_does_not_overwrite_newer_selection() {
        let controller = Mutex::new(TableController::default());
        let source = SlowTransactions;

        let (first, second) = tokio::join!(
            load_records(&controller, &source, RecordType::Transactions),
            load_records(&controller, &source, RecordType::Accounts),
        );

        assert_eq!(first, Ok(Applied::Stale));
        assert_eq!(second, Ok(Applied::Current));
        let controller = controller.lock().unwrap();
        assert_eq!(controller.load_state(), &LoadState::Loaded(accounts()));
    }
}
