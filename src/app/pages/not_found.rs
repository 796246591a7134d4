use dioxus::prelude::*;

use crate::app::components::Panel;
use crate::app::Route;
use crate::navigator::Screen;

/// Catch-all route. Paths below a known screen (`/home/x`) are sent to that
/// screen; anything else is reported as not found.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    let path = format!("/{}", segments.join("/"));

    if let Some(screen) = Screen::resolve(&path) {
        tracing::debug!(%path, ?screen, "Resolved by prefix");
        let _ = navigator.replace(Route::for_screen(screen));
        return rsx! {};
    }

    rsx! {
        Panel { title: "Page not found".to_string(),
            p { "Nothing lives at " code { "{path}" } }
            Link { to: Route::Welcome {}, "Back to the start" }
        }
    }
}
