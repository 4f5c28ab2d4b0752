//! The bank statements page: imported ICICI statement lines, the statement
//! upload form and the reconciliation trigger.

use axum::{
    extract::{FromRef, Multipart, Query, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    api::{ApiClient, UploadFile},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    pagination::{
        PageSize, PaginationConfig, PaginationIndicator, create_pagination_indicators, page_count,
    },
    records::BankStatementLine,
    records_page::{data_table, statistics_view},
    table::{TablePage, TableState, render_page, statement_columns},
};

/// The multipart field the statement is uploaded in.
const STATEMENT_FIELD: &str = "file";

/// Statement lines are shown in pages of the largest allowed size.
const STATEMENT_PAGE_SIZE: PageSize = PageSize::OPTIONS[PageSize::OPTIONS.len() - 1];

/// The state needed for the bank statements page and its endpoints.
#[derive(Debug, Clone)]
pub struct BankStatementsState {
    pub api_client: ApiClient,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for BankStatementsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BankStatementsQuery {
    /// Only show (un)reconciled lines. All lines are shown when absent.
    pub reconciled: Option<bool>,
    /// The one-based page of lines to show.
    pub page: Option<usize>,
}

/// Renders the bank statements page.
///
/// A failure to fetch the statement lines is shown on the page so the upload
/// form stays usable.
pub async fn get_bank_statements_page(
    State(state): State<BankStatementsState>,
    Query(query): Query<BankStatementsQuery>,
) -> Response {
    let lines = state
        .api_client
        .icici_transactions(query.reconciled)
        .await
        .inspect_err(|error| tracing::error!("Could not fetch bank statement lines: {error}"));

    let lines_view = match lines {
        Ok(lines) if lines.is_empty() => html! {
            p data-empty-state="true" class="py-8 text-center text-gray-500 dark:text-gray-400"
            {
                "No bank statement lines. Upload a statement to get started."
            }
        },
        Ok(lines) => statement_lines_view(&lines, &query, state.pagination_config.max_pages),
        Err(error) => Alert::Error {
            message: "Could not load bank statement lines".to_owned(),
            details: error.to_string(),
        }
        .into_html(),
    };

    bank_statements_view(query.reconciled, lines_view).into_response()
}

fn statement_page(lines: &[BankStatementLine], page: Option<usize>) -> TablePage {
    let mut table = TableState::new(STATEMENT_PAGE_SIZE);
    let page_count = page_count(lines.len(), STATEMENT_PAGE_SIZE);
    table.go_to_page(page.unwrap_or(1).saturating_sub(1), page_count);

    render_page(lines, &statement_columns(), &table)
}

fn page_url(reconciled: Option<bool>, page: usize) -> String {
    match reconciled {
        Some(reconciled) => format!(
            "{}?reconciled={reconciled}&page={page}",
            endpoints::BANK_STATEMENTS_VIEW
        ),
        None => format!("{}?page={page}", endpoints::BANK_STATEMENTS_VIEW),
    }
}

fn statement_lines_view(
    lines: &[BankStatementLine],
    query: &BankStatementsQuery,
    max_pages: usize,
) -> Markup {
    let page = statement_page(lines, query.page);
    let indicators = create_pagination_indicators(page.page_index, page.page_count, max_pages);

    html! {
        @if let Some((first, last)) = page.row_range() {
            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "Showing " (first) "-" (last) " of " (page.total_rows) " lines"
            }
        }

        div class="overflow-x-auto" { (data_table(&page, None)) }

        (statistics_view(&page.statistics))

        @if page.page_count > 1 {
            nav class="pagination" aria-label="Pages"
            {
                ul class="pagination flex flex-wrap items-center gap-1"
                {
                    @for indicator in indicators {
                        @match indicator {
                            PaginationIndicator::CurrPage(index) => {
                                li { span aria-current="page" class="px-3 py-1 rounded bg-blue-600 text-white" { (index + 1) } }
                            }
                            PaginationIndicator::Page(index) => {
                                li
                                {
                                    a href=(page_url(query.reconciled, index + 1)) class="px-3 py-1 rounded hover:bg-gray-100 dark:hover:bg-gray-700"
                                    {
                                        (index + 1)
                                    }
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                li { span class="px-2" { "…" } }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn filter_links(reconciled: Option<bool>) -> Markup {
    let links = [
        (None, "All", endpoints::BANK_STATEMENTS_VIEW.to_owned()),
        (
            Some(true),
            "Reconciled",
            format!("{}?reconciled=true", endpoints::BANK_STATEMENTS_VIEW),
        ),
        (
            Some(false),
            "Unreconciled",
            format!("{}?reconciled=false", endpoints::BANK_STATEMENTS_VIEW),
        ),
    ];

    html! {
        nav aria-label="Filter statement lines" class="flex gap-4 text-sm"
        {
            @for (filter, label, url) in links {
                @if filter == reconciled {
                    span aria-current="true" class="font-semibold" { (label) }
                } @else {
                    a href=(url) class=(LINK_STYLE) { (label) }
                }
            }
        }
    }
}

fn upload_form_view() -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(endpoints::UPLOAD_STATEMENT_API)
            enctype="multipart/form-data"
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-disabled-elt="find input, find button"
            class="space-y-4"
        {
            div
            {
                label
                    for=(STATEMENT_FIELD)
                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                {
                    "ICICI statement"
                }

                input
                    id=(STATEMENT_FIELD)
                    type="file"
                    name=(STATEMENT_FIELD)
                    accept=".xls,.xlsx"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Upload a statement exported from ICICI in Excel format (.xls or .xlsx)."
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" { (spinner) }
                "Upload Statement"
            }
        }
    }
}

fn reconcile_form_view() -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(endpoints::RECONCILE_API)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-disabled-elt="find button"
        {
            button type="submit" class=(BUTTON_SECONDARY_STYLE)
            {
                span class="inline htmx-indicator" { (spinner) }
                "Reconcile with Transactions"
            }
        }
    }
}

fn bank_statements_view(reconciled: Option<bool>, lines_view: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::BANK_STATEMENTS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-6 pb-24 lg:pb-8 lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Bank Statements" }

                    (reconcile_form_view())
                }

                div class="max-w-md" { (upload_form_view()) }

                (filter_links(reconciled))

                div id="statement-lines" class="space-y-4" { (lines_view) }
            }
        }
    };

    base("Bank Statements", &[], &content)
}

/// Uploads an ICICI statement to the backend and reports how many lines were
/// imported.
pub async fn upload_statement_endpoint(
    State(state): State<BankStatementsState>,
    multipart: Multipart,
) -> Response {
    let file = match read_statement(multipart).await {
        Ok(file) => file,
        Err(error) => {
            tracing::warn!("Rejected statement upload: {error}");
            return error.into_alert_response();
        }
    };

    match state.api_client.upload_icici_statement(&file).await {
        Ok(result) => {
            tracing::info!(
                "Imported {} new statement line(s) from {}",
                result.new_transactions,
                file.file_name
            );

            (
                StatusCode::CREATED,
                Alert::Success {
                    message: "Statement uploaded".to_owned(),
                    details: format!(
                        "{} of {} line(s) are new, {} were already imported. {}",
                        result.new_transactions,
                        result.total_transactions,
                        result.duplicate_transactions,
                        result.message
                    ),
                }
                .into_html(),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not upload statement {}: {error}", file.file_name);
            Error::from(error).into_alert_response()
        }
    }
}

/// Matches imported statement lines against ledger transactions.
pub async fn reconcile_endpoint(State(state): State<BankStatementsState>) -> Response {
    match state.api_client.reconcile_icici().await {
        Ok(result) => Alert::Success {
            message: "Reconciliation finished".to_owned(),
            details: format!(
                "{} of {} line(s) reconciled, {} left unreconciled. {}",
                result.reconciled_transactions,
                result.total_transactions,
                result.unreconciled_transactions,
                result.message
            ),
        }
        .into_html()
        .into_response(),
        Err(error) => {
            tracing::error!("Could not reconcile bank statements: {error}");
            Error::from(error).into_alert_response()
        }
    }
}

async fn read_statement(mut multipart: Multipart) -> Result<UploadFile, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        if field.name() == Some(STATEMENT_FIELD) {
            return read_statement_field(field).await;
        }
    }

    Err(Error::MissingFile)
}

async fn read_statement_field(field: Field<'_>) -> Result<UploadFile, Error> {
    let file_name = match field.file_name() {
        Some(file_name) if !file_name.is_empty() => file_name.to_owned(),
        _ => return Err(Error::MissingFile),
    };

    let content_type = excel_content_type(&file_name)
        .ok_or_else(|| Error::NotExcel(file_name.clone()))?
        .to_owned();

    let bytes = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    if bytes.is_empty() {
        return Err(Error::MissingFile);
    }

    Ok(UploadFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

/// The MIME type for an Excel workbook named `file_name`, `None` for any
/// other kind of file.
fn excel_content_type(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;

    match extension.to_ascii_lowercase().as_str() {
        "xls" => Some("application/vnd.ms-excel"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Json, Router,
        extract::{Multipart, Query},
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use scraper::{Html, Selector};
    use serde_json::{Value, json};

    use crate::{
        api::ApiClient,
        endpoints,
        pagination::PaginationConfig,
        test_utils::{MockBackend, assert_valid_html, select_text},
    };

    use super::{
        BankStatementsState, excel_content_type, get_bank_statements_page, reconcile_endpoint,
        upload_statement_endpoint,
    };

    fn test_server(base_url: &str) -> TestServer {
        let state = BankStatementsState {
            api_client: ApiClient::new(base_url, Duration::from_secs(5)),
            pagination_config: PaginationConfig::default(),
        };
        let app = Router::new()
            .route(endpoints::BANK_STATEMENTS_VIEW, get(get_bank_statements_page))
            .route(endpoints::UPLOAD_STATEMENT_API, post(upload_statement_endpoint))
            .route(endpoints::RECONCILE_API, post(reconcile_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server")
    }

    fn statement_line(id: i64, reconciled: bool) -> Value {
        json!({
            "id": id,
            "transaction_date": "2024-04-02",
            "value_date": "2024-04-02",
            "description": format!("NEFT-{id}"),
            "ref_no": format!("N{id}"),
            "debit": null,
            "credit": "100.00",
            "balance": "5000.00",
            "reconciled": reconciled,
            "transaction_id": null
        })
    }

    async fn statement_backend() -> MockBackend {
        let router = Router::new()
            .route(
                "/api/v1/bank-statements/icici",
                get(|Query(query): Query<Vec<(String, String)>>| async move {
                    let lines: Vec<Value> = match query.first().map(|(_, value)| value.as_str()) {
                        Some("true") => vec![statement_line(1, true)],
                        Some(_) => vec![statement_line(2, false), statement_line(3, false)],
                        None => vec![
                            statement_line(1, true),
                            statement_line(2, false),
                            statement_line(3, false),
                        ],
                    };
                    Json(Value::Array(lines))
                }),
            )
            .route(
                "/api/v1/bank-statements/upload/icici",
                post(|mut multipart: Multipart| async move {
                    let field = multipart.next_field().await.unwrap().unwrap();
                    assert_eq!(field.name(), Some("file"));
                    assert_eq!(field.file_name(), Some("april.xlsx"));
                    let bytes = field.bytes().await.unwrap();
                    assert_eq!(&bytes[..], b"PK fake workbook");

                    Json(json!({
                        "total_transactions": 12,
                        "new_transactions": 10,
                        "duplicate_transactions": 2,
                        "message": "Upload complete"
                    }))
                }),
            )
            .route(
                "/api/v1/bank-statements/reconcile/icici",
                post(|| async {
                    Json(json!({
                        "total_transactions": 3,
                        "reconciled_transactions": 2,
                        "unreconciled_transactions": 1,
                        "message": "Done"
                    }))
                }),
            );

        MockBackend::start(router).await
    }

    #[tokio::test]
    async fn lists_statement_lines() {
        let backend = statement_backend().await;
        let server = test_server(&backend.base_url());

        let response = server.get(endpoints::BANK_STATEMENTS_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "#statement-lines tbody tr").len(), 3);
        assert_eq!(
            select_text(&html, "[data-statistics=credit] dd")[0],
            "Total: ₹300.00"
        );
        let form = html
            .select(&Selector::parse("form[enctype='multipart/form-data']").unwrap())
            .next()
            .expect("No upload form found");
        assert_eq!(
            form.value().attr("hx-post"),
            Some(endpoints::UPLOAD_STATEMENT_API)
        );
    }

    #[tokio::test]
    async fn filters_by_reconciliation() {
        let backend = statement_backend().await;
        let server = test_server(&backend.base_url());

        let response = server
            .get(endpoints::BANK_STATEMENTS_VIEW)
            .add_query_param("reconciled", "false")
            .await;

        let html = Html::parse_document(&response.text());
        assert_eq!(select_text(&html, "#statement-lines tbody tr").len(), 2);
        assert_eq!(select_text(&html, "[aria-current=true]"), ["Unreconciled"]);
    }

    #[tokio::test]
    async fn backend_failure_keeps_the_page_usable() {
        let server = test_server("http://127.0.0.1:9/api/v1");

        let response = server.get(endpoints::BANK_STATEMENTS_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(
            select_text(&html, "#statement-lines [role=alert] p"),
            ["Could not load bank statement lines", "network request failed"]
        );
        assert!(
            html.select(&Selector::parse("input[type=file]").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn uploads_excel_statement() {
        let backend = statement_backend().await;
        let server = test_server(&backend.base_url());
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"PK fake workbook".to_vec())
                .file_name("april.xlsx")
                .mime_type("application/octet-stream"),
        );

        let response = server
            .post(endpoints::UPLOAD_STATEMENT_API)
            .multipart(form)
            .await;

        response.assert_status(StatusCode::CREATED);
        let html = Html::parse_fragment(&response.text());
        assert_eq!(
            select_text(&html, "[role=alert] p"),
            [
                "Statement uploaded",
                "10 of 12 line(s) are new, 2 were already imported. Upload complete"
            ]
        );
    }

    #[tokio::test]
    async fn rejects_files_that_are_not_excel() {
        let server = test_server("http://127.0.0.1:9/api/v1");
        let form = MultipartForm::new().add_part(
            "file",
            Part::text("a,b,c").file_name("april.csv").mime_type("text/csv"),
        );

        let response = server
            .post(endpoints::UPLOAD_STATEMENT_API)
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let html = Html::parse_fragment(&response.text());
        assert_eq!(
            select_text(&html, "[role=alert] p"),
            [
                "Unsupported file type",
                "\"april.csv\" is not an Excel workbook. Upload an .xls or .xlsx file."
            ]
        );
    }

    #[tokio::test]
    async fn rejects_upload_without_file() {
        let server = test_server("http://127.0.0.1:9/api/v1");
        let form = MultipartForm::new().add_text("comment", "no file here");

        let response = server
            .post(endpoints::UPLOAD_STATEMENT_API)
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let html = Html::parse_fragment(&response.text());
        assert_eq!(select_text(&html, "[role=alert] p")[0], "No file selected");
    }

    #[tokio::test]
    async fn reports_reconciliation_counts() {
        let backend = statement_backend().await;
        let server = test_server(&backend.base_url());

        let response = server.post(endpoints::RECONCILE_API).await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        assert_eq!(
            select_text(&html, "[role=alert] p"),
            [
                "Reconciliation finished",
                "2 of 3 line(s) reconciled, 1 left unreconciled. Done"
            ]
        );
    }

    #[test]
    fn recognises_excel_extensions() {
        assert_eq!(excel_content_type("April.XLS"), Some("application/vnd.ms-excel"));
        assert!(excel_content_type("april.xlsx").is_some());
        assert_eq!(excel_content_type("april.csv"), None);
        assert_eq!(excel_content_type("xlsx"), None);
    }
}
