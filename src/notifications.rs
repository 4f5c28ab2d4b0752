//! Triggers the backend's payment reminder notifications.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    alert::Alert,
    api::{ApiClient, NotificationReceipt},
};

/// The state needed for sending payment notifications.
#[derive(Debug, Clone)]
pub struct NotificationsState {
    pub api_client: ApiClient,
}

impl FromRef<AppState> for NotificationsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
        }
    }
}

/// Asks the backend to send reminders for upcoming payments and reports the
/// outcome as an alert.
pub async fn send_notifications_endpoint(State(state): State<NotificationsState>) -> Response {
    match state.api_client.send_payment_notifications().await {
        Ok(receipt) => {
            let details = match receipt {
                NotificationReceipt::Payments(payments) => {
                    tracing::info!("Sent reminders for {} payment(s)", payments.len());
                    format!("Reminders were sent for {} upcoming payment(s).", payments.len())
                }
                NotificationReceipt::Message(message) => message,
            };

            Alert::Success {
                message: "Payment notifications sent".to_owned(),
                details,
            }
            .into_html()
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not send payment notifications: {error}");
            Error::from(error).into_alert_response()
        }
    }
}
