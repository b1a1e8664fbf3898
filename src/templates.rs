use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    forms::{CreateForm, EditForm},
    models::{Document, FieldSet, MovieEditField, MovieId, NewMovieField, text_field},
    notify::{Icon, Notification},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "w-full bg-white rounded border border-gray-300 focus:border-indigo-500 focus:ring-2 focus:ring-indigo-200 text-base outline-none text-gray-700 py-1 px-3 leading-8 transition-colors duration-200 ease-in-out";
const BUTTON_CLASS: &str = "flex mx-auto text-white bg-green-600 border-0 py-2 px-8 focus:outline-none hover:bg-green-700 rounded text-lg";

// Swaps the submit label for the spinner. The button stays enabled.
const SPINNER_SCRIPT: &str = r#"
document.querySelectorAll('form[data-spinner]').forEach(function (form) {
  form.addEventListener('submit', function () {
    var button = form.querySelector('button[type=submit]');
    var spinner = document.getElementById('spinner-template');
    if (button && spinner) {
      button.setAttribute('aria-busy', 'true');
      button.innerHTML = spinner.innerHTML;
    }
  });
});
"#;

const TOAST_SCRIPT: &str = r#"
document.querySelectorAll('[data-toast-timer]').forEach(function (toast) {
  setTimeout(function () { toast.remove(); }, Number(toast.dataset.toastTimer));
});
"#;

pub fn index_page(movies: &[(MovieId, Document)]) -> String {
    page(
        "Movies",
        None,
        html! {
            div class="container px-5 py-8 mx-auto lg:w-1/2 md:w-2/3" {
                div class="flex items-center justify-between mb-6" {
                    h1 class="sm:text-3xl text-xl font-medium text-white" { "Movies" }
                    a class="text-green-400 hover:text-green-300" href="/movies/new" { "Add Movie" }
                }
                @if movies.is_empty() {
                    p class="text-gray-400" { "No movies yet." }
                } @else {
                    ul class="space-y-3" {
                        @for (id, doc) in movies {
                            (movie_row(id, doc))
                        }
                    }
                }
            }
        },
    )
}

pub fn create_page(form: &CreateForm, notification: Option<&Notification>) -> String {
    let fields = form.fields();
    page(
        "Add Movie",
        notification,
        form_section(
            "Add Movie",
            "/movies",
            html! {
                (text_input("Title", "title", fields.get(NewMovieField::Title), "p-2 w-1/2"))
                (text_input("Year", "year", fields.get(NewMovieField::Year), "p-2 w-1/2"))
                (text_input("Image Link", "image", fields.get(NewMovieField::Image), "p-2 w-full"))
                (text_area("Description", "description", fields.get(NewMovieField::Description)))
            },
            submit_button("submit", form.submitting()),
        ),
    )
}

pub fn edit_page(form: &EditForm, notification: Option<&Notification>) -> String {
    let fields = form.fields();
    page(
        "Update Movie",
        notification,
        form_section(
            "Update Movie",
            &format!("/movies/{}", urlencoding::encode(form.id().as_str())),
            html! {
                (text_input("Name", "name", fields.get(MovieEditField::Name), "p-2 w-1/2"))
                (text_input("Year", "year", fields.get(MovieEditField::Year), "p-2 w-1/2"))
                (text_input("Image Link", "image", fields.get(MovieEditField::Image), "p-2 w-full"))
                (text_area("Description", "description", fields.get(MovieEditField::Description)))
            },
            submit_button("Update Movie", form.submitting()),
        ),
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        None,
        html! {
            div class="min-h-screen flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, notification: Option<&Notification>, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="bg-gray-900 text-gray-600" {
                @if let Some(n) = notification {
                    (toast(n))
                }
                (body)
                template id="spinner-template" { (spinner()) }
                script { (PreEscaped(SPINNER_SCRIPT)) }
                script { (PreEscaped(TOAST_SCRIPT)) }
            }
        }
    }
    .into_string()
}

fn form_section(heading: &str, action: &str, fields: Markup, button: Markup) -> Markup {
    html! {
        section class="body-font relative" {
            div class="container px-5 py-8 mx-auto" {
                div class="flex flex-col text-center w-full mb-4" {
                    h1 class="sm:text-3xl text-xl font-medium mb-4 text-white" { (heading) }
                }
                form class="lg:w-1/2 md:w-2/3 mx-auto" method="post" action=(action) data-spinner {
                    div class="flex flex-wrap -m-2" {
                        (fields)
                        div class="p-2 w-full" { (button) }
                    }
                }
            }
        }
    }
}

fn text_input(label: &str, name: &str, value: &str, width: &str) -> Markup {
    html! {
        div class=(width) {
            div class="relative" {
                label for=(name) class="leading-7 text-sm text-gray-300" { (label) }
                input type="text" id=(name) name=(name) value=(value) class=(INPUT_CLASS);
            }
        }
    }
}

fn text_area(label: &str, name: &str, value: &str) -> Markup {
    html! {
        div class="p-2 w-full" {
            div class="relative" {
                label for=(name) class="leading-7 text-sm text-gray-300" { (label) }
                textarea id=(name) name=(name) class=(format!("{} h-32 resize-none", INPUT_CLASS)) { (value) }
            }
        }
    }
}

/// The server only ever renders an idle button; the spinner script swaps the
/// label while the request is in flight.
fn submit_button(label: &str, submitting: bool) -> Markup {
    html! {
        button type="submit" class=(BUTTON_CLASS) aria-busy=(submitting) { (label) }
    }
}

fn spinner() -> Markup {
    html! {
        span class="inline-block h-6 w-6 rounded-full border-4 border-white/40 border-t-white animate-spin" role="status" aria-label="Loading" {}
    }
}

fn toast(notification: &Notification) -> Markup {
    let (border, mark) = match notification.icon {
        Icon::Success => ("border-green-500", "\u{2713}"),
        Icon::Error => ("border-red-500", "\u{2715}"),
    };

    html! {
        div id="toast" role="status" data-icon=(icon_name(notification.icon)) data-toast-timer=(notification.timer_ms) class=(format!("fixed top-6 left-1/2 -translate-x-1/2 z-50 bg-white shadow-lg rounded-lg border-l-4 {border} px-6 py-4")) {
            div class="flex items-center gap-3" {
                span class="text-lg" { (mark) }
                p class="text-gray-800" { (notification.title) }
            }
            @if notification.buttons {
                button type="button" class="mt-3 text-sm text-blue-600" onclick="this.parentElement.remove()" { "OK" }
            }
        }
    }
}

fn icon_name(icon: Icon) -> &'static str {
    match icon {
        Icon::Success => "success",
        Icon::Error => "error",
    }
}

fn movie_row(id: &MovieId, doc: &Document) -> Markup {
    // Documents from the add form carry `title`, edited ones also carry `name`.
    let name = match text_field(doc, "name") {
        name if name.is_empty() => text_field(doc, "title"),
        name => name,
    };
    let year = text_field(doc, "year");

    html! {
        li class="bg-gray-800 rounded p-4 flex items-center justify-between" {
            div {
                span class="text-white font-medium" {
                    @if name.is_empty() { "Untitled" } @else { (name) }
                }
                @if !year.is_empty() {
                    span class="ml-2 text-gray-400" { "(" (year) ")" }
                }
            }
            a class="text-sm text-green-400 hover:text-green-300" href=(format!("/movies/{}/edit", urlencoding::encode(id.as_str()))) { "Edit" }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn create_page_renders_bound_fields_and_idle_button() {
        let mut form = CreateForm::new();
        form.edit(NewMovieField::Title, "Heat & Dust");

        let html = create_page(&form, None);
        assert!(html.contains("Add Movie"));
        assert!(html.contains(r#"value="Heat &amp; Dust""#));
        assert!(html.contains(r#"aria-busy="false">submit</button>"#));
        assert!(!html.contains(r#"id="toast""#));
    }

    #[test]
    fn pages_carry_the_client_spinner_hooks_and_never_disable_submit() {
        let create = create_page(&CreateForm::new(), None);
        let edit = edit_page(&EditForm::new(MovieId::new("m1")), None);

        for html in [create, edit] {
            assert!(html.contains(r#"method="post""#));
            assert!(html.contains(" data-spinner>"));
            assert!(html.contains(r#"<template id="spinner-template"><span class="inline-block"#));
            assert!(html.contains("animate-spin"));
            assert!(html.contains("form[data-spinner]"));
            assert!(html.contains(r#"<button type="submit""#));
            assert!(!html.contains("disabled"));
        }
    }

    #[test]
    fn toast_carries_icon_and_timer_without_buttons() {
        let n = Notification::error("permission denied", Duration::from_millis(3000));
        let html = create_page(&CreateForm::new(), Some(&n));

        assert!(html.contains(r#"data-icon="error""#));
        assert!(html.contains(r#"data-toast-timer="3000""#));
        assert!(html.contains("permission denied"));
        assert!(!html.contains(">OK</button>"));
    }

    #[test]
    fn edit_page_posts_back_to_the_record() {
        let form = EditForm::new(MovieId::new("abc123"));
        let html = edit_page(&form, None);

        assert!(html.contains(r#"action="/movies/abc123""#));
        assert!(html.contains(">Update Movie</button>"));
    }
}
