//! A stand-in for the BMS backend that serves canned responses over real HTTP.

use std::net::SocketAddr;

use axum::Router;
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

/// An axum server on a random local port, aborted when stopped or dropped.
pub(crate) struct MockBackend {
    address: SocketAddr,
    task: JoinHandle<()>,
}

impl MockBackend {
    /// Serve `router`, whose routes include the `/api/v1` prefix.
    pub(crate) async fn start(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind mock backend");
        let address = listener
            .local_addr()
            .expect("Could not get mock backend address");
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Mock backend stopped unexpectedly");
        });

        Self { address, task }
    }

    /// The API root to give to the client under test.
    pub(crate) fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.address)
    }

    /// Stop serving and wait until the port is closed.
    pub(crate) async fn stop(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A transaction as the backend sends it.
pub(crate) fn transaction_json(tr_no: i64, amount: f64) -> Value {
    json!({
        "TrNo": tr_no,
        "Date": "2024-01-15",
        "Description": format!("Transaction {tr_no}"),
        "Amount": amount,
        "PaymentMode": "Cash",
        "AccID": "ACC-001",
        "Department": "Serendipity",
        "Comments": null,
        "Category": "Income",
        "ZohoMatch": false
    })
}

/// An account as the backend sends it.
pub(crate) fn account_json(sl_no: i64, balance: f64) -> Value {
    json!({
        "SLNo": sl_no,
        "AccountName": format!("Account {sl_no}"),
        "Type": "ACC",
        "AccID": format!("ACC-{sl_no:03}"),
        "Balance": balance,
        "IntRate": 0.0,
        "NextDueDate": "2024-02-01",
        "Bank": "SBI",
        "Tenure": null,
        "EMIAmt": null,
        "Comments": null
    })
}
