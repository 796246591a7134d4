//! Session gate for every screen behind sign-in.

use dioxus::prelude::*;

use crate::app::context::use_session;
use crate::app::Route;
use crate::navigator::{gate, Screen};

/// Renders the child route only with a session; otherwise redirects to the
/// entry screen.
#[component]
pub fn SessionGate() -> Element {
    let session = use_session();
    let route = use_route::<Route>();
    let navigator = use_navigator();

    // Storage not read yet (server render, first client frame)
    if !session.is_ready() {
        return rsx! {
            p { aria_busy: "true", "Loading..." }
        };
    }

    let requested = route.screen().unwrap_or(Screen::Welcome);
    let current = session.current();
    let shown = gate(requested, current.as_ref());
    if shown != requested {
        tracing::debug!(?requested, "No session, redirecting to sign-in");
        let _ = navigator.replace(Route::for_screen(shown));
        return rsx! {};
    }

    rsx! {
        Outlet::<Route> {}
    }
}
