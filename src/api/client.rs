use std::{fmt, time::Duration};

use serde::Serialize;
use serde_json::Value;
use time::Date;

use crate::{
    api::{
        ApiError, ResponseBody, Resource, UploadFile,
        envelope::{decode_list, decode_record},
        multipart::MultipartBody,
    },
    records::{
        Account, BankStatementLine, BankStatementUploadResponse, FuturePrediction, RecordSet,
        RecordType, ReconciliationResponse, Transaction,
        wire::format_iso_date,
    },
};

/// The backend address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/v1";

/// The multipart field the statement upload endpoint reads the file from.
const STATEMENT_FIELD: &str = "file";

enum RequestBody {
    Empty,
    Json(String),
    Multipart(MultipartBody),
}

/// A decoded successful response: its status and its unwrapped payload.
struct Payload {
    status: u16,
    value: Value,
}

/// The result of asking the backend to send payment reminders.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationReceipt {
    /// The upcoming payments reminders were sent for.
    Payments(Vec<FuturePrediction>),
    /// A plain acknowledgement from the backend.
    Message(String),
}

/// A typed client for the BMS backend REST API.
///
/// Every call resolves to the unwrapped payload or fails with an [ApiError].
/// Calls are not retried or cached. The underlying HTTP client is blocking, so
/// each request runs on tokio's blocking thread pool.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`, e.g. `http://127.0.0.1:8000/api/v1`.
    ///
    /// `timeout` bounds each request from connecting to reading the full body.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            agent,
        }
    }

    /// The base URL every request path is joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every record of type `R`, passing `filters` as query parameters.
    pub async fn get_all<R: Resource>(&self, filters: &[(&str, &str)]) -> Result<Vec<R>, ApiError> {
        let payload = self
            .send("GET", R::COLLECTION, owned_query(filters), RequestBody::Empty)
            .await?;
        decode_list(payload.value, payload.status)
    }

    /// Fetch the record of type `R` with the primary key `id`.
    pub async fn get_by_id<R: Resource>(&self, id: i64) -> Result<R, ApiError> {
        let payload = self
            .send("GET", &R::member_path(id), Vec::new(), RequestBody::Empty)
            .await?;
        decode_record(payload.value, payload.status)
    }

    /// Create a record and return it as stored by the backend.
    pub async fn create<R: Resource>(&self, record: &R::Create) -> Result<R, ApiError> {
        let payload = self
            .send("POST", R::COLLECTION, Vec::new(), json_body(record)?)
            .await?;
        decode_record(payload.value, payload.status)
    }

    /// Replace the fields of a record and return the updated record.
    pub async fn update<R: Resource>(&self, id: i64, changes: &R::Update) -> Result<R, ApiError> {
        let payload = self
            .send("PUT", &R::member_path(id), Vec::new(), json_body(changes)?)
            .await?;
        decode_record(payload.value, payload.status)
    }

    /// Delete a record.
    ///
    /// Returns the unwrapped payload as is: depending on the collection the
    /// backend answers with the deleted record or with a status message.
    pub async fn delete<R: Resource>(&self, id: i64) -> Result<Value, ApiError> {
        let payload = self
            .send("DELETE", &R::member_path(id), Vec::new(), RequestBody::Empty)
            .await?;
        Ok(payload.value)
    }

    /// List every record of `record_type`.
    pub async fn list(&self, record_type: RecordType) -> Result<RecordSet, ApiError> {
        let records = match record_type {
            RecordType::Transactions => RecordSet::Transactions(self.get_all(&[]).await?),
            RecordType::Accounts => RecordSet::Accounts(self.get_all(&[]).await?),
            RecordType::Future => RecordSet::Future(self.get_all(&[]).await?),
        };

        Ok(records)
    }

    /// List the transactions dated between `start` and `end`, inclusive.
    pub async fn transactions_by_date_range(
        &self,
        start: Date,
        end: Date,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.date_range("/transactions/date-range/", start, end)
            .await
    }

    /// List the future predictions expected between `start` and `end`, inclusive.
    pub async fn future_by_date_range(
        &self,
        start: Date,
        end: Date,
    ) -> Result<Vec<FuturePrediction>, ApiError> {
        self.date_range("/future/date-range/", start, end).await
    }

    async fn date_range<R: Resource>(
        &self,
        path: &str,
        start: Date,
        end: Date,
    ) -> Result<Vec<R>, ApiError> {
        let query = vec![
            ("start_date".to_owned(), format_iso_date(start)),
            ("end_date".to_owned(), format_iso_date(end)),
        ];
        let payload = self.send("GET", path, query, RequestBody::Empty).await?;
        decode_list(payload.value, payload.status)
    }

    /// Look up an account by its `AccID`.
    pub async fn account_by_acc_id(&self, acc_id: &str) -> Result<Account, ApiError> {
        let path = format!("/accounts/by-ccid/{}/", encode_path_segment(acc_id));
        let payload = self.send("GET", &path, Vec::new(), RequestBody::Empty).await?;
        decode_record(payload.value, payload.status)
    }

    /// Add `amount` (negative to subtract) to the balance of the account `acc_id`.
    pub async fn adjust_balance(&self, acc_id: &str, amount: f64) -> Result<Account, ApiError> {
        #[derive(Serialize)]
        struct Adjustment {
            amount: f64,
        }

        let path = format!("/accounts/{}/balance/", encode_path_segment(acc_id));
        let payload = self
            .send("POST", &path, Vec::new(), json_body(&Adjustment { amount })?)
            .await?;
        decode_record(payload.value, payload.status)
    }

    /// Mark the future prediction `tr_no` as paid.
    pub async fn mark_paid(&self, tr_no: i64) -> Result<FuturePrediction, ApiError> {
        let path = format!("/future/{tr_no}/mark-paid/");
        let payload = self
            .send("POST", &path, Vec::new(), RequestBody::Json("{}".to_owned()))
            .await?;
        decode_record(payload.value, payload.status)
    }

    /// Ask the backend to send reminders for upcoming payments.
    pub async fn send_payment_notifications(&self) -> Result<NotificationReceipt, ApiError> {
        let payload = self
            .send(
                "POST",
                "/notifications/send-payment-notifications/",
                Vec::new(),
                RequestBody::Json("{}".to_owned()),
            )
            .await?;

        match payload.value {
            Value::Array(_) => decode_list(payload.value, payload.status).map(NotificationReceipt::Payments),
            Value::Object(ref object) => match object.get("message").and_then(Value::as_str) {
                Some(message) => Ok(NotificationReceipt::Message(message.to_owned())),
                None => Err(ApiError::InvalidFormat {
                    status: payload.status,
                }),
            },
            _ => Err(ApiError::InvalidFormat {
                status: payload.status,
            }),
        }
    }

    /// Upload an ICICI statement export (`.xls` or `.xlsx`).
    pub async fn upload_icici_statement(
        &self,
        file: &UploadFile,
    ) -> Result<BankStatementUploadResponse, ApiError> {
        let body = MultipartBody::single_file(STATEMENT_FIELD, file);
        let payload = self
            .send(
                "POST",
                "/bank-statements/upload/icici",
                Vec::new(),
                RequestBody::Multipart(body),
            )
            .await?;
        decode_record(payload.value, payload.status)
    }

    /// Match imported statement lines against ledger transactions.
    pub async fn reconcile_icici(&self) -> Result<ReconciliationResponse, ApiError> {
        let payload = self
            .send(
                "POST",
                "/bank-statements/reconcile/icici",
                Vec::new(),
                RequestBody::Json("{}".to_owned()),
            )
            .await?;
        decode_record(payload.value, payload.status)
    }

    /// List imported statement lines, optionally only (un)reconciled ones.
    pub async fn icici_transactions(
        &self,
        reconciled: Option<bool>,
    ) -> Result<Vec<BankStatementLine>, ApiError> {
        let query = reconciled
            .map(|reconciled| vec![("reconciled".to_owned(), reconciled.to_string())])
            .unwrap_or_default();
        let payload = self
            .send("GET", "/bank-statements/icici", query, RequestBody::Empty)
            .await?;
        decode_list(payload.value, payload.status)
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        query: Vec<(String, String)>,
        body: RequestBody,
    ) -> Result<Payload, ApiError> {
        let agent = self.agent.clone();
        let url = format!("{}{path}", self.base_url);

        tokio::task::spawn_blocking(move || send_blocking(&agent, method, &url, &query, body))
            .await
            .map_err(|error| {
                tracing::error!("HTTP request task for {method} {path} did not complete: {error}");
                ApiError::Network
            })?
    }
}

fn owned_query(filters: &[(&str, &str)]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

fn json_body<T: Serialize>(value: &T) -> Result<RequestBody, ApiError> {
    serde_json::to_string(value)
        .map(RequestBody::Json)
        .map_err(|error| ApiError::InvalidRecord {
            status: ApiError::NO_RESPONSE_STATUS,
            message: error.to_string(),
        })
}

/// Percent-encode everything except RFC 3986 unreserved characters.
fn encode_path_segment(segment: &str) -> String {
    segment
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (byte as char).to_string()
            }
            byte => format!("%{byte:02X}"),
        })
        .collect()
}

fn send_blocking(
    agent: &ureq::Agent,
    method: &str,
    url: &str,
    query: &[(String, String)],
    body: RequestBody,
) -> Result<Payload, ApiError> {
    tracing::debug!("{method} request to {url}");

    let mut request = agent.request(method, url).set("Accept", "application/json");
    for (key, value) in query {
        request = request.query(key, value);
    }

    let result = match body {
        RequestBody::Empty => request.call(),
        RequestBody::Json(json) => request
            .set("Content-Type", "application/json")
            .send_string(&json),
        RequestBody::Multipart(multipart) => request
            .set("Content-Type", &multipart.content_type())
            .send_bytes(multipart.bytes()),
    };

    match result {
        Ok(response) => read_success(response),
        Err(ureq::Error::Status(status, response)) => {
            let error = read_failure(status, response);
            tracing::warn!("{method} {url} failed with status {status}: {error}");
            Err(error)
        }
        Err(ureq::Error::Transport(transport)) => {
            tracing::error!("{method} {url} failed before a response was received: {transport}");
            Err(ApiError::Network)
        }
    }
}

fn read_success(response: ureq::Response) -> Result<Payload, ApiError> {
    let status = response.status();
    let is_json = response
        .header("content-type")
        .is_some_and(|content_type| content_type.contains("application/json"));

    if !is_json {
        return Err(ApiError::InvalidFormat { status });
    }

    let text = response.into_string().map_err(|error| {
        tracing::error!("could not read response body: {error}");
        ApiError::Network
    })?;
    let value: Value =
        serde_json::from_str(&text).map_err(|_| ApiError::InvalidFormat { status })?;

    Ok(Payload {
        status,
        value: ResponseBody::from_json(value).into_payload(),
    })
}

fn read_failure(status: u16, response: ureq::Response) -> ApiError {
    let status_text = response.status_text().to_owned();
    let body_message = response
        .into_string()
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(&text).ok())
        .and_then(|body| error_message(&body));

    let message = body_message.unwrap_or_else(|| {
        if status_text.is_empty() {
            format!("HTTP error! status: {status}")
        } else {
            status_text
        }
    });

    ApiError::Http { status, message }
}

/// The human readable message of an error body: `message`, then `detail`.
fn error_message(body: &Value) -> Option<String> {
    ["message", "detail"]
        .into_iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Json, Router,
        extract::Query,
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
        extract::Path,
        routing::{delete, get, post},
    };
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        api::{ApiClient, ApiError, NotificationReceipt, UploadFile},
        records::{
            Category, Department, PaymentMode, RecordSet, RecordType, Transaction,
            TransactionCreate,
        },
        test_utils::{MockBackend, account_json, transaction_json},
    };

    fn client(backend: &MockBackend) -> ApiClient {
        ApiClient::new(&backend.base_url(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn bare_and_enveloped_lists_decode_to_the_same_records() {
        let router = Router::new()
            .route(
                "/api/v1/transactions/",
                get(|| async { Json(json!([transaction_json(1, -50.0)])) }),
            )
            .route(
                "/api/v1/future/",
                get(|| async {
                    let mut record = transaction_json(1, -50.0);
                    record["Paid"] = json!(false);
                    Json(json!({"data": [record], "message": "ok"}))
                }),
            );
        let backend = MockBackend::start(router).await;
        let client = client(&backend);

        let bare = client.list(RecordType::Transactions).await.unwrap();
        let enveloped = client.list(RecordType::Future).await.unwrap();

        let (RecordSet::Transactions(bare), RecordSet::Future(enveloped)) = (bare, enveloped) else {
            panic!("unexpected record sets");
        };
        assert_eq!(bare.len(), 1);
        assert_eq!(enveloped.len(), 1);
        assert_eq!(bare[0].tr_no, enveloped[0].tr_no);
        assert_eq!(bare[0].amount, enveloped[0].amount);
    }

    #[tokio::test]
    async fn error_message_comes_from_body() {
        let router = Router::new()
            .route(
                "/api/v1/transactions/7/",
                get(|| async {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"detail": "Transaction not found"})),
                    )
                }),
            )
            .route(
                "/api/v1/accounts/7/",
                get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"message": "Bad account"}))) }),
            );
        let backend = MockBackend::start(router).await;
        let client = client(&backend);

        let transaction = client.get_by_id::<Transaction>(7).await;
        let account = client.get_by_id::<crate::records::Account>(7).await;

        assert_eq!(
            transaction,
            Err(ApiError::Http {
                status: 404,
                message: "Transaction not found".to_owned()
            })
        );
        assert_eq!(
            account,
            Err(ApiError::Http {
                status: 400,
                message: "Bad account".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn error_message_falls_back_to_status_text() {
        let router = Router::new().route(
            "/api/v1/transactions/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
        );
        let backend = MockBackend::start(router).await;

        let got = client(&backend).get_all::<Transaction>(&[]).await;

        assert_eq!(
            got,
            Err(ApiError::Http {
                status: 503,
                message: "Service Unavailable".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn non_json_success_is_invalid_format() {
        let router = Router::new().route(
            "/api/v1/transactions/",
            get(|| async { "<html>not json</html>" }),
        );
        let backend = MockBackend::start(router).await;

        let got = client(&backend).get_all::<Transaction>(&[]).await;

        assert_eq!(got, Err(ApiError::InvalidFormat { status: 200 }));
    }

    #[tokio::test]
    async fn unknown_enum_value_is_invalid_record() {
        let router = Router::new().route(
            "/api/v1/transactions/",
            get(|| async {
                let mut record = transaction_json(1, 10.0);
                record["PaymentMode"] = json!("Paypal");
                Json(json!([record]))
            }),
        );
        let backend = MockBackend::start(router).await;

        let got = client(&backend).get_all::<Transaction>(&[]).await;

        let Err(ApiError::InvalidRecord { status, message }) = got else {
            panic!("want invalid record error, got {got:?}");
        };
        assert_eq!(status, 200);
        assert!(message.contains("Paypal"), "got message {message:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let backend = MockBackend::start(Router::new()).await;
        let base_url = backend.base_url();
        backend.stop().await;

        let got = ApiClient::new(&base_url, Duration::from_secs(2))
            .get_all::<Transaction>(&[])
            .await;

        assert_eq!(got, Err(ApiError::Network));
        assert_eq!(ApiError::Network.status(), 0);
    }

    #[tokio::test]
    async fn create_posts_json_and_returns_stored_record() {
        let router = Router::new().route(
            "/api/v1/transactions/",
            post(|Json(body): Json<Value>| async move {
                let mut stored = body.clone();
                stored["TrNo"] = json!(42);
                stored["ZohoMatch"] = json!(false);
                (StatusCode::CREATED, Json(json!({"data": stored})))
            }),
        );
        let backend = MockBackend::start(router).await;
        let payload = TransactionCreate {
            date: date!(2024 - 01 - 15),
            description: "Office rent".to_owned(),
            amount: -25000.0,
            payment_mode: PaymentMode::IciciCurrent,
            acc_id: "ACC-001".to_owned(),
            department: Department::Serendipity,
            comments: Some("January".to_owned()),
            category: Category::Maintenance,
            zoho_match: false,
        };

        let created = client(&backend).create::<Transaction>(&payload).await.unwrap();

        assert_eq!(created.tr_no, 42);
        assert_eq!(created.date, payload.date);
        assert_eq!(created.comments.as_deref(), Some("January"));
    }

    #[tokio::test]
    async fn date_range_sends_iso_dates() {
        let router = Router::new().route(
            "/api/v1/transactions/date-range/",
            get(|Query(params): Query<Vec<(String, String)>>| async move {
                assert_eq!(
                    params,
                    [
                        ("start_date".to_owned(), "2024-01-01".to_owned()),
                        ("end_date".to_owned(), "2024-01-31".to_owned())
                    ]
                );
                Json(json!([transaction_json(3, 1.0)]))
            }),
        );
        let backend = MockBackend::start(router).await;

        let got = client(&backend)
            .transactions_by_date_range(date!(2024 - 01 - 01), date!(2024 - 01 - 31))
            .await
            .unwrap();

        assert_eq!(got.len(), 1);
    }

    #[tokio::test]
    async fn account_and_prediction_actions() {
        fn prediction(paid: bool) -> Value {
            let mut record = transaction_json(9, -1200.0);
            record["Paid"] = json!(paid);
            record
        }

        let router = Router::new()
            .route(
                "/api/v1/accounts/by-ccid/{acc_id}/",
                get(|Path(acc_id): Path<String>| async move {
                    assert_eq!(acc_id, "ACC-001");
                    Json(account_json(1, 500.0))
                }),
            )
            .route(
                "/api/v1/accounts/{acc_id}/balance/",
                post(|Json(body): Json<Value>| async move {
                    let amount = body["amount"].as_f64().unwrap_or_default();
                    Json(json!({"data": account_json(1, 500.0 + amount)}))
                }),
            )
            .route(
                "/api/v1/future/date-range/",
                get(|| async { Json(json!([prediction(false)])) }),
            )
            .route(
                "/api/v1/future/{tr_no}/mark-paid/",
                post(|| async { Json(prediction(true)) }),
            )
            .route(
                "/api/v1/transactions/{tr_no}/",
                delete(|Path(tr_no): Path<i64>| async move {
                    Json(json!({"message": format!("Transaction {tr_no} deleted")}))
                }),
            );
        let backend = MockBackend::start(router).await;
        let client = client(&backend);

        let account = client.account_by_acc_id("ACC-001").await.unwrap();
        assert_eq!(account.balance, 500.0);

        let account = client.adjust_balance("ACC-001", -150.0).await.unwrap();
        assert_eq!(account.balance, 350.0);

        let upcoming = client
            .future_by_date_range(date!(2024 - 01 - 01), date!(2024 - 01 - 31))
            .await
            .unwrap();
        assert_eq!(upcoming.len(), 1);
        assert!(!upcoming[0].paid);

        assert!(client.mark_paid(9).await.unwrap().paid);

        let deleted = client.delete::<Transaction>(4).await.unwrap();
        assert_eq!(deleted, json!({"message": "Transaction 4 deleted"}));
    }

    #[tokio::test]
    async fn uploads_statement_as_multipart() {
        let router = Router::new().route(
            "/api/v1/bank-statements/upload/icici",
            post(|headers: axum::http::HeaderMap, body: String| async move {
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                assert!(content_type.starts_with("multipart/form-data; boundary="));
                assert!(body.contains("name=\"file\"; filename=\"april.xls\""));
                Json(json!({
                    "total_transactions": 10,
                    "new_transactions": 7,
                    "duplicate_transactions": 3,
                    "message": "Imported"
                }))
                .into_response()
            }),
        );
        let backend = MockBackend::start(router).await;
        let file = UploadFile {
            file_name: "april.xls".to_owned(),
            content_type: "application/vnd.ms-excel".to_owned(),
            bytes: b"statement".to_vec(),
        };

        let got = client(&backend).upload_icici_statement(&file).await.unwrap();

        assert_eq!(got.new_transactions, 7);
        assert_eq!(got.duplicate_transactions, 3);
    }

    #[tokio::test]
    async fn notifications_accept_list_or_message() {
        let router = Router::new().route(
            "/api/v1/notifications/send-payment-notifications/",
            post(|| async { Json(json!({"message": "Sent 2 reminders"})) }),
        );
        let backend = MockBackend::start(router).await;

        let got = client(&backend).send_payment_notifications().await;

        assert_eq!(
            got,
            Ok(NotificationReceipt::Message("Sent 2 reminders".to_owned()))
        );
    }

    #[test]
    fn encodes_account_ids_in_paths() {
        assert_eq!(super::encode_path_segment("CC 9003/a"), "CC%209003%2Fa");
        assert_eq!(super::encode_path_segment("ACC-001"), "ACC-001");
    }
}
