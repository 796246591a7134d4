//! BookRoom screen and the quote/pay flow it shares with rescheduling.

use dioxus::prelude::*;

use crate::app::browser;
use crate::app::components::{ErrorLine, Panel};
use crate::app::context::{use_api, use_navigate, use_session, Navigate};
use crate::booking::{BookingKind, BookingStep, Reaction};
use crate::navigator::{NavEvent, Screen};

#[component]
pub fn BookRoom() -> Element {
    rsx! {
        QuotePayFlow { from: Screen::BookRoom, reschedule: false }
    }
}

fn apply(reaction: Reaction, mut error: Signal<Option<String>>, navigate: Navigate) {
    error.set(reaction.error);
    if let Some(text) = reaction.alert {
        browser::alert(&text);
    }
    if reaction.navigate_to == Some(Screen::BookedRooms) {
        navigate.go(NavEvent::PaymentConfirmed);
    }
}

/// Date form, then price confirmation and payment.
#[component]
pub(super) fn QuotePayFlow(from: Screen, reschedule: bool) -> Element {
    let api = use_api();
    let session = use_session();
    let navigate = use_navigate(from);
    let mut step = use_signal(BookingStep::default);
    let mut kind = use_signal(|| BookingKind::New);
    let mut date = use_signal(String::new);
    let mut booking_id = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let client_id = session.current().map(|s| s.client_id).unwrap_or_default();

    let request_quote = {
        let api = api.clone();
        let client_id = client_id.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let entered = date();
            if entered.is_empty() {
                error.set(Some("Choose a date".to_string()));
                return;
            }
            let flow = if reschedule {
                let id = booking_id().trim().to_string();
                if id.is_empty() {
                    error.set(Some("Enter the booking ID".to_string()));
                    return;
                }
                BookingKind::Reschedule { booking_id: id }
            } else {
                BookingKind::New
            };

            let api = api.clone();
            let client_id = client_id.clone();
            spawn(async move {
                loading.set(true);
                let outcome = flow.request_quote(&api, &client_id, &entered).await;
                loading.set(false);
                let reaction = step.write().on_quote(&entered, outcome);
                kind.set(flow);
                apply(reaction, error, navigate);
            });
        }
    };

    let pay = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(quote) = step.read().quote().cloned() else {
            return;
        };
        let flow = kind();
        let api = api.clone();
        let client_id = client_id.clone();
        spawn(async move {
            loading.set(true);
            let outcome = flow.pay(&api, &client_id, &quote).await;
            loading.set(false);
            let reaction = step.write().on_payment(outcome);
            apply(reaction, error, navigate);
        });
    };

    let current = step();
    match current {
        BookingStep::Payment(quote) => {
            let confirm = quote.confirm_line();
            let price = quote.price_line();
            rsx! {
                Panel { title: "Booking payment".to_string(),
                    p { "{confirm}" }
                    form { class: "form", onsubmit: pay,
                        div { class: "form-group", "{price}" }
                        ErrorLine { message: error() }
                        div { class: "footer",
                            button { r#type: "submit", disabled: loading(), "Pay" }
                            button {
                                r#type: "button",
                                class: "secondary",
                                onclick: move |_| {
                                    step.write().cancel();
                                    error.set(None);
                                },
                                "Cancel"
                            }
                        }
                    }
                }
            }
        }
        BookingStep::Booking => {
            let (title, prompt, action) = if reschedule {
                ("Reschedule booking", "Choose a new date for your booking", "Reschedule")
            } else {
                ("Book room", "Choose a date to book a room", "Book Room")
            };
            rsx! {
                Panel { title: title.to_string(),
                    p { "{prompt}" }
                    form { class: "form", onsubmit: request_quote,
                        if reschedule {
                            label {
                                "Booking ID"
                                input {
                                    r#type: "text",
                                    inputmode: "numeric",
                                    value: booking_id(),
                                    oninput: move |evt: FormEvent| booking_id.set(evt.value()),
                                }
                            }
                        }
                        div { class: "form-group",
                            input {
                                r#type: "date",
                                name: "date",
                                value: date(),
                                oninput: move |evt: FormEvent| date.set(evt.value()),
                            }
                        }
                        ErrorLine { message: error() }
                        div { class: "footer",
                            button { r#type: "submit", disabled: loading(), aria_busy: loading().to_string(), "{action}" }
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
    }
}
