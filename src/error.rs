//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, api::ApiError, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A call to the backend API failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The records view named in the request has expired or never existed.
    ///
    /// Views are evicted when too many pages are open, and they do not survive
    /// a server restart. The client should reload the page to get a new view.
    #[error("the records view has expired")]
    UnknownView,

    /// A table command was sent before any records were loaded.
    #[error("no records are loaded")]
    TableNotLoaded,

    /// A table command named a column the current record type does not have.
    #[error("the column \"{0}\" does not exist")]
    UnknownColumn(String),

    /// The table command could not be parsed.
    #[error("invalid table command: {0}")]
    InvalidTableCommand(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a statement file.
    #[error("no statement file was uploaded")]
    MissingFile,

    /// The uploaded file does not have an Excel extension.
    #[error("\"{0}\" is not an Excel workbook")]
    NotExcel(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the lock on the view registry or a table controller.
    #[error("could not acquire the view lock")]
    ViewLockError,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::Api(error) => {
                tracing::error!("A backend request failed: {error}");
                InternalServerError {
                    description: "Could not reach the BMS backend",
                    fix: &format!("The backend said: {error}. Try again later."),
                }
                .into_response()
            }
            Error::ViewLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Api(error) => (
                api_error_status(&error),
                Alert::Error {
                    message: "The backend request failed".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::UnknownView => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "This page has expired".to_owned(),
                    details: "Reload the page to continue.".to_owned(),
                },
            ),
            Error::TableNotLoaded => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "No records loaded".to_owned(),
                    details: "Select a record type before sorting, filtering or paging."
                        .to_owned(),
                },
            ),
            Error::UnknownColumn(column) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown column".to_owned(),
                    details: format!("The column \"{column}\" does not exist for these records."),
                },
            ),
            Error::InvalidTableCommand(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid table action".to_owned(),
                    details,
                },
            ),
            Error::MissingFile => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No file selected".to_owned(),
                    details: "Choose an ICICI statement (.xls or .xlsx) to upload.".to_owned(),
                },
            ),
            Error::NotExcel(file_name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unsupported file type".to_owned(),
                    details: format!(
                        "\"{file_name}\" is not an Excel workbook. Upload an .xls or .xlsx file."
                    ),
                },
            ),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the upload".to_owned(),
                    details,
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

/// The status to answer with when a backend call fails.
///
/// Client errors from the backend are passed through, everything else is a
/// bad gateway from the point of view of the browser.
pub(crate) fn api_error_status(error: &ApiError) -> StatusCode {
    StatusCode::from_u16(error.status())
        .ok()
        .filter(StatusCode::is_client_error)
        .unwrap_or(StatusCode::BAD_GATEWAY)
}
