//! Labelled inputs shared by the record forms.
//!
//! Each input is rendered with the value the user submitted so a rejected
//! form keeps its input, and with the field's error message underneath.

use maud::{Markup, html};

use crate::html::{FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE};

/// The parts every input has in common.
pub(crate) struct Field<'a> {
    /// The input name, which is also the backend's field name.
    pub name: &'a str,
    pub label: &'a str,
    /// The submitted value, or empty for a fresh form.
    pub value: &'a str,
    pub error: Option<&'a str>,
    pub required: bool,
}

fn label(field: &Field<'_>) -> Markup {
    html! {
        label for=(field.name) class=(FORM_LABEL_STYLE)
        {
            (field.label)
            @if !field.required {
                span class="font-normal text-gray-500 dark:text-gray-400" { " (optional)" }
            }
        }
    }
}

fn error_message(field: &Field<'_>) -> Markup {
    html! {
        @if let Some(error) = field.error {
            p id={ (field.name) "-error" } class=(FORM_ERROR_STYLE) { (error) }
        }
    }
}

/// A text or date input.
pub(crate) fn text_input(field: Field<'_>, input_type: &str) -> Markup {
    html! {
        div
        {
            (label(&field))

            input
                id=(field.name)
                type=(input_type)
                name=(field.name)
                value=(field.value)
                required[field.required]
                aria-invalid=[field.error.map(|_| "true")]
                class=(FORM_TEXT_INPUT_STYLE);

            (error_message(&field))
        }
    }
}

/// A number input for money, shown with a rupee sign.
///
/// The input accepts any number the browser can enter; the server decides
/// whether it is valid.
pub(crate) fn amount_input(field: Field<'_>) -> Markup {
    html! {
        div
        {
            (label(&field))

            div class="input-wrapper"
            {
                input
                    id=(field.name)
                    type="number"
                    step="0.01"
                    name=(field.name)
                    value=(field.value)
                    required[field.required]
                    aria-invalid=[field.error.map(|_| "true")]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (error_message(&field))
        }
    }
}

/// A plain number input, e.g. an interest rate or a number of months.
pub(crate) fn number_input(field: Field<'_>, step: &str) -> Markup {
    html! {
        div
        {
            (label(&field))

            input
                id=(field.name)
                type="number"
                step=(step)
                name=(field.name)
                value=(field.value)
                required[field.required]
                aria-invalid=[field.error.map(|_| "true")]
                class=(FORM_TEXT_INPUT_STYLE);

            (error_message(&field))
        }
    }
}

/// A drop down of `options`, each given by its wire spelling.
pub(crate) fn select_input(field: Field<'_>, options: &[&str]) -> Markup {
    html! {
        div
        {
            (label(&field))

            select
                id=(field.name)
                name=(field.name)
                required[field.required]
                aria-invalid=[field.error.map(|_| "true")]
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[field.value.is_empty()] { "Select " (field.label.to_lowercase()) }

                @for option in options {
                    option value=(option) selected[*option == field.value] { (option) }
                }
            }

            (error_message(&field))
        }
    }
}

/// A multi-line text input.
pub(crate) fn text_area(field: Field<'_>) -> Markup {
    html! {
        div
        {
            (label(&field))

            textarea
                id=(field.name)
                name=(field.name)
                rows="3"
                required[field.required]
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (field.value)
            }

            (error_message(&field))
        }
    }
}

/// A checkbox for a yes/no flag.
pub(crate) fn checkbox_input(name: &str, label: &str, checked: bool) -> Markup {
    html! {
        div class="flex items-center gap-2"
        {
            input
                id=(name)
                type="checkbox"
                name=(name)
                value="true"
                checked[checked]
                class="w-4 h-4 text-blue-600 bg-gray-100 border-gray-300 rounded
                    focus:ring-blue-500 dark:bg-gray-700 dark:border-gray-600";

            label for=(name) class="text-sm font-medium text-gray-900 dark:text-white"
            {
                (label)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{Field, select_input, text_input};

    #[test]
    fn keeps_value_and_shows_error() {
        let markup = text_input(
            Field {
                name: "Description",
                label: "Description",
                value: "Office rent",
                error: Some("Too long"),
                required: true,
            },
            "text",
        );
        let html = Html::parse_fragment(&markup.into_string());

        let input = html
            .select(&Selector::parse("input").unwrap())
            .next()
            .unwrap();
        assert_eq!(input.value().attr("value"), Some("Office rent"));
        assert!(input.value().attr("required").is_some());
        let error = html
            .select(&Selector::parse("#Description-error").unwrap())
            .next()
            .unwrap();
        assert_eq!(error.text().collect::<String>(), "Too long");
    }

    #[test]
    fn selects_submitted_option() {
        let markup = select_input(
            Field {
                name: "Department",
                label: "Department",
                value: "Trademan",
                error: None,
                required: true,
            },
            &["Serendipity", "Dhoom Studios", "Trademan"],
        );
        let html = Html::parse_fragment(&markup.into_string());

        let selected: Vec<String> = html
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.text().collect())
            .collect();
        assert_eq!(selected, ["Trademan"]);
    }
}
