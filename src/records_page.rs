//! The records page: a record type selector and an interactive table.
//!
//! Every page load opens a view in the [ViewRegistry] and renders its id into
//! the page. The selector and the table controls post that id back so each
//! open page keeps its own record type, sort, filter and paging.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRefresh;
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    alert::Alert,
    api::ApiClient,
    controller::{LoadState, TableController, load_records},
    endpoints,
    format::format_amount,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    pagination::{PageSize, PaginationConfig, PaginationIndicator, create_pagination_indicators},
    records::RecordType,
    table::{ColumnStatistics, SortDirection, TableCommand, TablePage},
    views::{ViewId, ViewRegistry},
};

/// The state needed for the records page and its table endpoints.
#[derive(Debug, Clone)]
pub struct RecordsPageState {
    pub api_client: ApiClient,
    pub views: Arc<Mutex<ViewRegistry>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for RecordsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            views: state.views.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
}

/// The record type selector's submission.
#[derive(Debug, Deserialize)]
pub struct SelectRecordTypeForm {
    pub view_id: ViewId,
    pub record_type: RecordType,
}

/// A table control's submission. Which of the optional fields are needed
/// depends on `command`.
#[derive(Debug, Deserialize)]
pub struct TableCommandForm {
    pub view_id: ViewId,
    pub command: String,
    pub column: Option<String>,
    pub filter: Option<String>,
    pub page_size: Option<String>,
    pub page: Option<String>,
}

impl TableCommandForm {
    /// Turn the submitted fields into a [TableCommand].
    ///
    /// # Errors
    /// Returns [Error::InvalidTableCommand] if the command is unknown or the
    /// field it needs is missing or malformed.
    pub fn to_command(&self) -> Result<TableCommand, Error> {
        let column = || {
            self.column
                .clone()
                .filter(|column| !column.is_empty())
                .ok_or_else(|| {
                    Error::InvalidTableCommand(format!("\"{}\" needs a column", self.command))
                })
        };

        match self.command.as_str() {
            "sort" => Ok(TableCommand::Sort(column()?)),
            "toggle_column" => Ok(TableCommand::ToggleColumn(column()?)),
            "filter" => Ok(TableCommand::Filter(
                self.filter.as_deref().unwrap_or_default().trim().to_owned(),
            )),
            "first" => Ok(TableCommand::FirstPage),
            "previous" => Ok(TableCommand::PreviousPage),
            "next" => Ok(TableCommand::NextPage),
            "last" => Ok(TableCommand::LastPage),
            "page" => {
                let page = self.page.as_deref().unwrap_or_default();
                page.trim()
                    .parse()
                    .map(TableCommand::GoToPage)
                    .map_err(|_| Error::InvalidTableCommand(format!("\"{page}\" is not a page")))
            }
            "page_size" => self
                .page_size
                .as_deref()
                .unwrap_or_default()
                .parse::<PageSize>()
                .map(TableCommand::PageSize)
                .map_err(|error| Error::InvalidTableCommand(error.to_string())),
            other => Err(Error::InvalidTableCommand(format!(
                "unknown command \"{other}\""
            ))),
        }
    }
}

fn lock_views(views: &Mutex<ViewRegistry>) -> Result<MutexGuard<'_, ViewRegistry>, Error> {
    views.lock().map_err(|error| {
        tracing::error!("Could not acquire the view registry lock: {error}");
        Error::ViewLockError
    })
}

fn lock_controller(
    controller: &Mutex<TableController>,
) -> Result<MutexGuard<'_, TableController>, Error> {
    controller.lock().map_err(|error| {
        tracing::error!("Could not acquire the table controller lock: {error}");
        Error::ViewLockError
    })
}

fn find_view(
    views: &Mutex<ViewRegistry>,
    view_id: &ViewId,
) -> Result<Arc<Mutex<TableController>>, Error> {
    lock_views(views)?.get(view_id).ok_or(Error::UnknownView)
}

/// Renders the records page, loading `?type=` (transactions by default)
/// into a newly opened view.
pub async fn get_records_page(
    State(state): State<RecordsPageState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Response, Error> {
    let record_type = query.record_type.unwrap_or(RecordType::Transactions);
    let (view_id, controller) = lock_views(&state.views)?.create();

    load_records(&controller, &state.api_client, record_type).await?;

    let panel = {
        let controller = lock_controller(&controller)?;
        records_panel(&view_id, &controller, state.pagination_config.max_pages)
    };

    Ok(records_page_view(panel).into_response())
}

/// Switches a view to another record type and renders its new panel.
///
/// An expired view makes the page reload itself.
pub async fn select_record_type_endpoint(
    State(state): State<RecordsPageState>,
    Form(form): Form<SelectRecordTypeForm>,
) -> Response {
    let controller = match find_view(&state.views, &form.view_id) {
        Ok(controller) => controller,
        Err(Error::UnknownView) => return (HxRefresh(true), StatusCode::OK).into_response(),
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = load_records(&controller, &state.api_client, form.record_type).await {
        return error.into_alert_response();
    }

    match lock_controller(&controller) {
        Ok(controller) => records_panel(
            &form.view_id,
            &controller,
            state.pagination_config.max_pages,
        )
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Applies a sort, filter, paging or column command to a view and renders
/// its table.
///
/// An expired view makes the page reload itself.
pub async fn records_command_endpoint(
    State(state): State<RecordsPageState>,
    Form(form): Form<TableCommandForm>,
) -> Response {
    let controller = match find_view(&state.views, &form.view_id) {
        Ok(controller) => controller,
        Err(Error::UnknownView) => return (HxRefresh(true), StatusCode::OK).into_response(),
        Err(error) => return error.into_alert_response(),
    };

    let result = form.to_command().and_then(|command| {
        let mut controller = lock_controller(&controller)?;
        controller.apply(command)?;

        controller.page().ok_or(Error::TableNotLoaded)
    });

    match result {
        Ok(page) => records_table(&form.view_id, &page, state.pagination_config.max_pages)
            .into_response(),
        Err(error) => {
            tracing::warn!("Rejected table command {:?}: {error}", form.command);
            error.into_alert_response()
        }
    }
}

fn records_page_view(panel: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECORDS_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-4 pb-24 lg:pb-8 lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Records" }

                    button
                        type="button"
                        hx-post=(endpoints::NOTIFICATIONS_API)
                        hx-target="#alert-container"
                        hx-target-error="#alert-container"
                        hx-swap="innerHTML"
                        hx-disabled-elt="this"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        span class="inline htmx-indicator" { (spinner) }
                        "Send Payment Notifications"
                    }
                }

                div id="records-panel" class="space-y-4"
                {
                    (panel)
                }
            }
        }
    };

    base("Records", &[], &content)
}

/// The record type selector and, depending on the load state, the table or a
/// message. Rendered inside `#records-panel`.
fn records_panel(view_id: &ViewId, controller: &TableController, max_pages: usize) -> Markup {
    let selected = controller.record_type();

    html! {
        form
            hx-post=(endpoints::RECORDS_SELECT)
            hx-trigger="change"
            hx-target="#records-panel"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-sync="this:replace"
            class="flex items-center gap-2"
        {
            input type="hidden" name="view_id" value=(view_id);

            label for="record_type" class="text-sm font-medium" { "Record type" }

            select id="record_type" name="record_type" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for record_type in RecordType::ALL {
                    option
                        value=(record_type.as_query_value())
                        selected[selected == Some(record_type)]
                    {
                        (record_type.label())
                    }
                }
            }
        }

        @match controller.load_state() {
            LoadState::Idle => {
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Choose a record type to see its records."
                }
            }
            LoadState::Loading(record_type) => {
                p role="status" class="text-sm"
                {
                    "Loading " (record_type.label().to_lowercase()) "…"
                }
            }
            LoadState::NoData(record_type) => {
                p role="status" data-empty-state="true" class="py-8 text-center text-gray-500 dark:text-gray-400"
                {
                    (record_type.no_data_message())
                }
            }
            LoadState::Failed { record_type, message } => {
                (Alert::Error {
                    message: format!("Could not load {}", record_type.label().to_lowercase()),
                    details: message.clone(),
                }
                .into_html())
            }
            LoadState::Loaded(_) => {
                @if let Some(page) = controller.page() {
                    input
                        type="search"
                        name="filter"
                        placeholder="Search all columns"
                        aria-label="Search all columns"
                        value=(page.filter)
                        hx-post=(endpoints::RECORDS_COMMAND)
                        hx-trigger="input changed delay:300ms, search"
                        hx-vals=(command_vals(view_id, "filter", None))
                        hx-target="#records-table"
                        hx-target-error="#alert-container"
                        hx-swap="innerHTML"
                        hx-sync="this:replace"
                        class=(FORM_TEXT_INPUT_STYLE);

                    div id="records-table" class="space-y-4"
                    {
                        (records_table(view_id, &page, max_pages))
                    }
                }
            }
        }
    }
}

/// The `hx-vals` of a table control.
fn command_vals(view_id: &ViewId, command: &str, argument: Option<(&str, String)>) -> String {
    let mut vals = json!({
        "view_id": view_id.as_str(),
        "command": command,
    });

    if let Some((key, value)) = argument {
        vals[key] = Value::String(value);
    }

    vals.to_string()
}

fn command_button(
    view_id: &ViewId,
    command: &str,
    argument: Option<(&str, String)>,
    enabled: bool,
    label: Markup,
    class: &str,
) -> Markup {
    html! {
        button
            type="button"
            hx-post=(endpoints::RECORDS_COMMAND)
            hx-vals=(command_vals(view_id, command, argument))
            hx-target="#records-table"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            disabled[!enabled]
            class=(class)
        {
            (label)
        }
    }
}

const PAGE_BUTTON_STYLE: &str = "px-3 py-1 rounded border border-gray-300 \
    dark:border-gray-600 hover:enabled:bg-gray-100 dark:hover:enabled:bg-gray-700 \
    disabled:opacity-50 disabled:cursor-not-allowed";

const CURRENT_PAGE_STYLE: &str = "px-3 py-1 rounded bg-blue-600 text-white";

/// The column toggles, table, statistics and paging controls of a loaded
/// view. Rendered inside `#records-table`.
fn records_table(view_id: &ViewId, page: &TablePage, max_pages: usize) -> Markup {
    let summary = match page.row_range() {
        Some((first, last)) if page.filtered_rows == page.total_rows => {
            format!("Showing {first}-{last} of {} records", page.total_rows)
        }
        Some((first, last)) => format!(
            "Showing {first}-{last} of {} records (filtered from {})",
            page.filtered_rows, page.total_rows
        ),
        None => format!("No records match the filter (0 of {})", page.total_rows),
    };

    html! {
        fieldset class="flex flex-wrap gap-2 text-xs"
        {
            legend class="sr-only" { "Columns" }

            @for column in &page.columns {
                (command_button(
                    view_id,
                    "toggle_column",
                    Some(("column", column.key.to_owned())),
                    true,
                    html! {
                        span aria-hidden="true" { @if column.visible { "☑ " } @else { "☐ " } }
                        (column.label)
                    },
                    PAGE_BUTTON_STYLE,
                ))
            }
        }

        p class="text-sm text-gray-600 dark:text-gray-400" { (summary) }

        div class="overflow-x-auto"
        {
            (data_table(page, Some(view_id)))
        }

        (statistics_view(&page.statistics))

        (pagination_view(view_id, page, max_pages))
    }
}

/// A table of `page`'s rows.
///
/// With a `view_id` the headers become sort controls for that view.
pub(crate) fn data_table(page: &TablePage, view_id: Option<&ViewId>) -> Markup {
    html! {
        table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    @for header in &page.headers {
                        @let aria_sort = match header.sort {
                            Some(SortDirection::Ascending) => "ascending",
                            Some(SortDirection::Descending) => "descending",
                            None => "none",
                        };
                        @let indicator = match header.sort {
                            Some(SortDirection::Ascending) => " ▲",
                            Some(SortDirection::Descending) => " ▼",
                            None => "",
                        };

                        th scope="col" aria-sort=(aria_sort) class=(TABLE_CELL_STYLE)
                        {
                            @if let Some(view_id) = view_id {
                                (command_button(
                                    view_id,
                                    "sort",
                                    Some(("column", header.key.to_owned())),
                                    true,
                                    html! { (header.label) (indicator) },
                                    "uppercase font-semibold hover:underline",
                                ))
                            } @else {
                                (header.label)
                            }
                        }
                    }
                }
            }

            tbody
            {
                @for row in &page.rows {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        @for cell in row {
                            td class=(TABLE_CELL_STYLE) title=[cell.tooltip.as_deref()] { (cell.text) }
                        }
                    }
                }

                @if page.rows.is_empty() {
                    tr
                    {
                        td
                            colspan=(page.headers.len().max(1))
                            data-empty-state="true"
                            class="px-6 py-4 text-center"
                        {
                            "No matching records."
                        }
                    }
                }
            }
        }
    }
}

/// Sum, count, average, min and max of the money columns over the filtered rows.
pub(crate) fn statistics_view(statistics: &[ColumnStatistics]) -> Markup {
    html! {
        @if !statistics.is_empty() {
            dl class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3"
            {
                @for column in statistics {
                    div
                        data-statistics=(column.key)
                        class="p-4 rounded-lg bg-white dark:bg-gray-800 text-sm"
                    {
                        dt class="font-semibold text-gray-900 dark:text-white" { (column.label) }
                        dd class="mt-1" { "Total: " (format_amount(Some(column.sum))) }
                        dd { "Count: " (column.count) }
                        dd { "Average: " (format_amount(column.average)) }
                        dd { "Min: " (format_amount(column.min)) }
                        dd { "Max: " (format_amount(column.max)) }
                    }
                }
            }
        }
    }
}

fn pagination_view(view_id: &ViewId, page: &TablePage, max_pages: usize) -> Markup {
    let indicators = create_pagination_indicators(page.page_index, page.page_count, max_pages);

    html! {
        div class="flex flex-wrap items-center justify-between gap-4"
        {
            nav class="pagination" aria-label="Pages"
            {
                ul class="pagination flex flex-wrap items-center gap-1"
                {
                    li { (command_button(view_id, "first", None, page.can_previous(), html! { "«" }, PAGE_BUTTON_STYLE)) }
                    li { (command_button(view_id, "previous", None, page.can_previous(), html! { "‹" }, PAGE_BUTTON_STYLE)) }

                    @for indicator in indicators {
                        @match indicator {
                            PaginationIndicator::CurrPage(index) => {
                                li { span aria-current="page" class=(CURRENT_PAGE_STYLE) { (index + 1) } }
                            }
                            PaginationIndicator::Page(index) => {
                                li
                                {
                                    (command_button(
                                        view_id,
                                        "page",
                                        Some(("page", index.to_string())),
                                        true,
                                        html! { (index + 1) },
                                        PAGE_BUTTON_STYLE,
                                    ))
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                li { span class="px-2" { "…" } }
                            }
                        }
                    }

                    li { (command_button(view_id, "next", None, page.can_next(), html! { "›" }, PAGE_BUTTON_STYLE)) }
                    li { (command_button(view_id, "last", None, page.can_next(), html! { "»" }, PAGE_BUTTON_STYLE)) }
                }
            }

            label class="flex items-center gap-2 text-sm"
            {
                "Rows per page"

                select
                    name="page_size"
                    hx-post=(endpoints::RECORDS_COMMAND)
                    hx-trigger="change"
                    hx-vals=(command_vals(view_id, "page_size", None))
                    hx-target="#records-table"
                    hx-target-error="#alert-container"
                    hx-swap="innerHTML"
                    class="p-1 rounded border border-gray-300 dark:border-gray-600 bg-gray-50 dark:bg-gray-700"
                {
                    @for size in PageSize::OPTIONS {
                        option value=(size) selected[size == page.page_size] { (size) }
                    }
                }
            }
        }
    }
}
