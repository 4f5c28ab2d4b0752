//! Alert system for displaying success and error messages to users.
//!
//! Alerts are returned as HTML fragments that htmx swaps into the
//! `#alert-container` element rendered by [crate::html::base], or embedded
//! directly in a page.

use maud::{Markup, html};

/// A success or error message with optional details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (style, icon, message, details) = match self {
            Alert::Success { message, details } => (
                "text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800",
                "✓",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
                "!",
                message,
                details,
            ),
        };

        html! {
            div
                role="alert"
                class={ "flex items-start gap-3 p-4 mb-4 text-sm border rounded-lg " (style) }
            {
                span class="font-bold" aria-hidden="true" { (icon) }

                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty()
                    {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}
