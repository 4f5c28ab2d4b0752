//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    bank_statements::{get_bank_statements_page, reconcile_endpoint, upload_statement_endpoint},
    endpoints,
    forms::{
        AccountForm, FuturePredictionForm, TransactionForm, get_new_record_form,
        get_new_record_page, submit_record_form,
    },
    not_found::get_404_not_found,
    notifications::send_notifications_endpoint,
    records_page::{get_records_page, records_command_endpoint, select_record_type_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::RECORDS_VIEW, get(get_records_page))
        .route(endpoints::NEW_RECORD_VIEW, get(get_new_record_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_record_form::<TransactionForm>),
        )
        .route(
            endpoints::NEW_ACCOUNT_VIEW,
            get(get_new_record_form::<AccountForm>),
        )
        .route(
            endpoints::NEW_FUTURE_VIEW,
            get(get_new_record_form::<FuturePredictionForm>),
        )
        .route(endpoints::BANK_STATEMENTS_VIEW, get(get_bank_statements_page));

    // These are called by htmx and answer with HTML fragments.
    let fragment_routes = Router::new()
        .route(endpoints::RECORDS_SELECT, post(select_record_type_endpoint))
        .route(endpoints::RECORDS_COMMAND, post(records_command_endpoint))
        .route(
            endpoints::TRANSACTIONS_API,
            post(submit_record_form::<TransactionForm>),
        )
        .route(
            endpoints::ACCOUNTS_API,
            post(submit_record_form::<AccountForm>),
        )
        .route(
            endpoints::FUTURE_API,
            post(submit_record_form::<FuturePredictionForm>),
        )
        .route(
            endpoints::UPLOAD_STATEMENT_API,
            post(upload_statement_endpoint),
        )
        .route(endpoints::RECONCILE_API, post(reconcile_endpoint))
        .route(
            endpoints::NOTIFICATIONS_API,
            post(send_notifications_endpoint),
        );

    page_routes
        .merge(fragment_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the records page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::RECORDS_VIEW)
}
