//! A web dashboard for the BMS financial records backend.
//!
//! The dashboard browses, sorts, filters and summarises transactions, accounts
//! and future predictions, creates new records, imports and reconciles ICICI
//! bank statements and triggers payment reminders. Every record lives in the
//! backend's REST API; this library renders the HTML pages and fragments that
//! talk to it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod bank_statements;
mod config;
mod controller;
mod endpoints;
mod error;
mod format;
mod forms;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod notifications;
mod pagination;
mod records;
mod records_page;
mod routing;
mod table;
#[cfg(test)]
mod test_utils;
mod timezone;
mod views;

pub use api::ApiClient;
pub use app_state::AppState;
pub use config::Config;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
