//! The forms for creating transactions, accounts and future predictions.
//!
//! A submission is validated on the server before anything is sent to the
//! backend. A rejected submission is answered with the form itself, filled in
//! with the user's input and the errors, which htmx swaps in place of the
//! submitted form. An accepted one redirects to the record type selection page.

mod account;
mod fields;
mod future;
mod new_record_page;
mod transaction;
mod validation;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::de::DeserializeOwned;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    api::{ApiClient, Resource},
    endpoints,
    error::api_error_status,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link, loading_spinner,
        rupee_input_styles,
    },
    navigation::NavBar,
    records::RecordType,
    timezone::get_local_offset,
};

pub use account::AccountForm;
pub use future::FuturePredictionForm;
pub use new_record_page::get_new_record_page;
pub use transaction::TransactionForm;
pub use validation::FieldErrors;

/// The raw input of a form for creating one kind of record.
pub trait RecordForm: DeserializeOwned + Send + Sized {
    /// The record the form creates.
    type Resource: Resource;

    const RECORD_TYPE: RecordType;
    /// The route the form posts to.
    const ENDPOINT: &'static str;

    /// A fresh form, with dates defaulting to `today`.
    fn with_defaults(today: Date) -> Self;

    /// Turn the input into a creation payload.
    ///
    /// # Errors
    /// Returns a message for every field that is missing or malformed.
    fn validate(&self) -> Result<<Self::Resource as Resource>::Create, FieldErrors>;

    /// The inputs of the form, filled with the current input and `errors`.
    fn fields(&self, errors: &FieldErrors) -> Markup;
}

/// The state needed to show and submit the record forms.
#[derive(Debug, Clone)]
pub struct RecordFormState {
    pub api_client: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for RecordFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page with an empty form for `F`'s record type.
pub async fn get_new_record_form<F: RecordForm>(
    State(state): State<RecordFormState>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!(
            "could not get local time offset from timezone {}",
            &state.local_timezone
        );
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    Ok(record_form_page(&F::with_defaults(today)).into_response())
}

/// Validates a submitted form and creates the record through the backend.
///
/// Redirects to the record type selection page on success. Otherwise the form
/// is sent back with the user's input and either the field errors (422) or
/// the backend's error message.
pub async fn submit_record_form<F: RecordForm>(
    State(state): State<RecordFormState>,
    Form(form): Form<F>,
) -> Response {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            tracing::debug!(
                "Rejected {} form with {} invalid field(s)",
                F::RECORD_TYPE,
                errors.len()
            );
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                record_form_view(&form, &errors, None),
            )
                .into_response();
        }
    };

    match state.api_client.create::<F::Resource>(&payload).await {
        Ok(_) => (
            HxRedirect(created_redirect_url(F::RECORD_TYPE)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create {}: {error}", F::RECORD_TYPE.singular());
            let message = error.to_string();

            (
                api_error_status(&error),
                record_form_view(&form, &FieldErrors::default(), Some(&message)),
            )
                .into_response()
        }
    }
}

/// The record type selection page, confirming that a `record_type` was created.
fn created_redirect_url(record_type: RecordType) -> String {
    match serde_urlencoded::to_string([("created", record_type)]) {
        Ok(param) => format!("{}?{}", endpoints::NEW_RECORD_VIEW, param),
        Err(error) => {
            tracing::error!("Could not encode the created record type {record_type}: {error}");
            endpoints::NEW_RECORD_VIEW.to_owned()
        }
    }
}

fn record_form_page<F: RecordForm>(form: &F) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_RECORD_VIEW).into_html();
    let title = format!("New {}", F::RECORD_TYPE.singular());
    let form = record_form_view(form, &FieldErrors::default(), None);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full space-y-4 pb-24 lg:pb-8"
            {
                h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl" { (title) }

                p class="text-sm" { (link(endpoints::NEW_RECORD_VIEW, "Choose a different record type")) }

                (form)
            }
        }
    };

    base(&title, &[rupee_input_styles()], &content)
}

pub(crate) fn record_form_view<F: RecordForm>(
    form: &F,
    errors: &FieldErrors,
    api_error: Option<&str>,
) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(F::ENDPOINT)
            hx-target-error="this"
            hx-swap="outerHTML"
            hx-disabled-elt="find button"
            class="w-full space-y-4 md:space-y-6"
        {
            @if let Some(api_error) = api_error {
                div
                    role="alert"
                    class="p-4 text-sm text-red-800 border border-red-300 rounded-lg bg-red-50
                        dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
                {
                    p class="font-medium" { "Could not create " (F::RECORD_TYPE.singular().to_lowercase()) }
                    p { (api_error) }
                }
            }

            (form.fields(errors))

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" { (spinner) }
                "Create " (F::RECORD_TYPE.singular())
            }
        }
    }
}
