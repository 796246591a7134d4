//! Cancel a booking and show the refund.

use dioxus::prelude::*;

use crate::app::components::{ErrorLine, Panel};
use crate::app::context::{report, use_api, use_navigate, use_session};
use crate::booking;
use crate::navigator::{NavEvent, Screen};

#[component]
pub fn CancelBooking() -> Element {
    let api = use_api();
    let session = use_session();
    let navigate = use_navigate(Screen::CancelBooking);
    let mut booking_id = use_signal(String::new);
    let mut refund = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let client_id = session.current().map(|s| s.client_id).unwrap_or_default();

    let handle_cancel = move |evt: FormEvent| {
        evt.prevent_default();
        let id = booking_id().trim().to_string();
        if id.is_empty() {
            error.set(Some("Enter the booking ID".to_string()));
            return;
        }
        let api = api.clone();
        let client_id = client_id.clone();
        spawn(async move {
            error.set(None);
            refund.set(None);
            loading.set(true);
            let outcome = booking::cancel_booking(&api, &id, &client_id).await;
            loading.set(false);
            match outcome.into_result() {
                Ok(text) => refund.set(Some(text)),
                Err(rejection) => report(rejection, None, error),
            }
        });
    };

    rsx! {
        Panel { title: "Cancel booking".to_string(),
            form { class: "form", onsubmit: handle_cancel,
                label {
                    "Booking ID"
                    input {
                        r#type: "text",
                        inputmode: "numeric",
                        name: "booking_id",
                        value: booking_id(),
                        oninput: move |evt: FormEvent| booking_id.set(evt.value()),
                    }
                }
                ErrorLine { message: error() }
                if let Some(text) = refund() {
                    p { class: "note", "{text}" }
                }
                div { class: "footer",
                    button { r#type: "submit", disabled: loading(), aria_busy: loading().to_string(),
                        "Cancel booking"
                    }
                    button {
                        r#type: "button",
                        class: "secondary",
                        onclick: move |_| {
                            navigate.go(NavEvent::GoHome);
                        },
                        "Home"
                    }
                }
            }
        }
    }
}
