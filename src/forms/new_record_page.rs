use axum::{
    extract::Query,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    alert::Alert,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    records::RecordType,
};

#[derive(Debug, Default, Deserialize)]
pub struct NewRecordQuery {
    /// Set after a record was created, to confirm it to the user.
    pub created: Option<RecordType>,
}

/// Renders the page for choosing which kind of record to create.
pub async fn get_new_record_page(Query(query): Query<NewRecordQuery>) -> Response {
    new_record_view(query.created).into_response()
}

fn form_endpoint(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Transactions => endpoints::NEW_TRANSACTION_VIEW,
        RecordType::Accounts => endpoints::NEW_ACCOUNT_VIEW,
        RecordType::Future => endpoints::NEW_FUTURE_VIEW,
    }
}

fn description(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Transactions => "Record money coming in or going out.",
        RecordType::Accounts => "Track a loan, card, chit or bank account.",
        RecordType::Future => "Plan a payment or receipt that is expected later.",
    }
}

fn new_record_view(created: Option<RecordType>) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_RECORD_VIEW).into_html();
    let confirmation = created.map(|record_type| {
        Alert::Success {
            message: format!("{} created", record_type.singular()),
            details: String::new(),
        }
        .into_html()
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full space-y-4 pb-24 lg:pb-8"
            {
                @if let Some(confirmation) = confirmation {
                    (confirmation)
                }

                h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl"
                {
                    "New Record"
                }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "What would you like to add?"
                }

                ul id="record-types" class="space-y-3"
                {
                    @for record_type in RecordType::ALL {
                        li
                        {
                            a
                                href=(form_endpoint(record_type))
                                class="block p-4 bg-white border border-gray-200 rounded-lg
                                    shadow-sm hover:bg-gray-100 dark:bg-gray-800
                                    dark:border-gray-700 dark:hover:bg-gray-700"
                            {
                                h2 class="font-semibold" { (record_type.singular()) }
                                p class="text-sm text-gray-500 dark:text-gray-400"
                                {
                                    (description(record_type))
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("New Record", &[], &content)
}
