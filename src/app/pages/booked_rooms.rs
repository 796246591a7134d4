//! Live list of booked rooms.

use dioxus::prelude::*;

use crate::app::bookings_feed::use_bookings_feed;
use crate::app::components::{ErrorLine, Panel};
use crate::app::context::use_navigate;
use crate::navigator::{NavEvent, Screen};

#[component]
pub fn BookedRooms() -> Element {
    let feed = use_bookings_feed();
    let navigate = use_navigate(Screen::BookedRooms);

    let state = feed.read();
    let rows: Vec<(String, String)> = state
        .rooms
        .iter()
        .enumerate()
        .map(|(i, room)| (format!("{}-{}", room.booking_id, i), room.label()))
        .collect();
    let error = state.error.clone();
    let waiting = !state.connected && rows.is_empty() && error.is_none();
    drop(state);

    rsx! {
        Panel { title: "Booked rooms".to_string(),
            ErrorLine { message: error }
            if waiting {
                p { aria_busy: "true", "Connecting..." }
            } else if rows.is_empty() {
                p { "No bookings yet" }
            }
            ul { class: "bookings",
                for (key, label) in rows {
                    li { key: "{key}", "{label}" }
                }
            }
            div { class: "footer",
                button {
                    r#type: "button",
                    onclick: move |_| {
                        navigate.go(NavEvent::GoHome);
                    },
                    "Home"
                }
                button {
                    r#type: "button",
                    onclick: move |_| {
                        navigate.go(NavEvent::StartBooking);
                    },
                    "Book room"
                }
            }
        }
    }
}
