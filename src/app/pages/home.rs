//! Home screen.

use dioxus::prelude::*;

use crate::app::components::Panel;
use crate::app::context::{use_navigate, use_session};
use crate::navigator::{NavEvent, Screen};

const DEFAULT_AVATAR: Asset = asset!("/assets/default-avatar.svg");

#[component]
pub fn Home() -> Element {
    let session = use_session();
    let navigate = use_navigate(Screen::Home);

    // The session gate guarantees a session here
    let Some(current) = session.current() else {
        return rsx! {};
    };
    let greeting = format!("Welcome, {}", current.client_name);

    rsx! {
        Panel { title: "Home".to_string(),
            match current.profile_photo {
                Some(url) => rsx! { img { class: "avatar", src: "{url}", alt: "Profile photo" } },
                None => rsx! { img { class: "avatar", src: DEFAULT_AVATAR, alt: "Profile photo" } },
            }
            p { "{greeting}" }
            div { class: "footer",
                button {
                    r#type: "button",
                    onclick: move |_| {
                        navigate.go(NavEvent::ViewBookings);
                    },
                    "Booked rooms"
                }
                button {
                    r#type: "button",
                    onclick: move |_| {
                        navigate.go(NavEvent::StartCancellation);
                    },
                    "Cancel booking"
                }
                button {
                    r#type: "button",
                    onclick: move |_| {
                        navigate.go(NavEvent::StartReschedule);
                    },
                    "Reschedule booking"
                }
                button {
                    r#type: "button",
                    class: "secondary",
                    onclick: move |_| {
                        navigate.go(NavEvent::SignedOut);
                    },
                    "Logout"
                }
            }
        }
    }
}
