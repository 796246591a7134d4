//! Layout component wrapping all pages with Pico CSS and common elements.

use dioxus::prelude::*;

use crate::app::Route;

/// CSS styles for the application (extends Pico CSS).
const CUSTOM_STYLES: &str = r#"
:root { --pico-font-size: 15px; }
.base-container { max-width: 420px; margin: 2rem auto; }
.base-container .header { font-size: 1.5rem; font-weight: 600; margin-bottom: 1rem; }
.footer { display: flex; gap: 0.5rem; margin-top: 0.5rem; }
.footer button { margin: 0; }
.error { color: var(--pico-del-color); }
.note { color: var(--pico-ins-color); }
.avatar { width: 96px; height: 96px; border-radius: 50%; object-fit: cover; }
.mode-switch { display: flex; gap: 0.25rem; margin-bottom: 1rem; }
.mode-switch button { padding: 0.25rem 0.75rem; margin: 0; }
.mode-switch button.active { background: var(--pico-primary-background); color: var(--pico-primary-inverse); }
.bookings li { list-style: none; }
small { color: var(--pico-muted-color); }
"#;

/// Root layout shared by every route.
#[component]
pub fn Shell() -> Element {
    let version = env!("CARGO_PKG_VERSION");

    rsx! {
        // Head elements - Dioxus hoists these to the real <head>
        document::Title { "Room Finder" }
        document::Link { rel: "stylesheet", href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css" }
        document::Style { {CUSTOM_STYLES} }

        header { class: "container",
            nav {
                ul {
                    li { strong { "Room Finder" } }
                }
            }
        }
        main { class: "container",
            Outlet::<Route> {}
        }
        footer { class: "container",
            small { "Room Finder v{version}" }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct PanelProps {
    /// Panel heading
    pub title: String,
    pub children: Element,
}

/// Centered card holding one screen's form.
#[component]
pub fn Panel(props: PanelProps) -> Element {
    rsx! {
        article { class: "base-container",
            div { class: "header", "{props.title}" }
            div { class: "content", {props.children} }
        }
    }
}

/// Inline error line; renders nothing without a message.
#[component]
pub fn ErrorLine(#[props(!optional)] message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! { p { class: "error", role: "alert", "{message}" } },
        None => rsx! {},
    }
}
