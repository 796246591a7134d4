//! Dioxus fullstack application entry point.
//!
//! The root component resolves the client configuration, installs the
//! shared contexts and hands over to the router.

use dioxus::prelude::*;

pub mod bookings_feed;
pub mod browser;
pub mod components;
pub mod context;
pub mod pages;

use crate::config::{fetch_client_config, ClientConfig};
use crate::navigator::Screen;
use components::{SessionGate, Shell};
use context::use_app_context;
use pages::{BookRoom, BookedRooms, CancelBooking, Home, NotFound, RescheduleBooking, Welcome};

/// Root app component with routing
#[component]
pub fn App() -> Element {
    let config = use_resource(|| async {
        match fetch_client_config().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Client config unavailable, using defaults: {}", e);
                ClientConfig::default()
            }
        }
    });

    let Some(config) = config.read().clone() else {
        return rsx! {
            p { aria_busy: "true", "Loading..." }
        };
    };

    rsx! {
        Providers { config }
    }
}

#[component]
fn Providers(config: ClientConfig) -> Element {
    use_app_context(config);

    rsx! {
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        #[route("/")]
        Welcome {},
        #[layout(SessionGate)]
            #[route("/home")]
            Home {},
            #[route("/booked-rooms")]
            BookedRooms {},
            #[route("/book-room")]
            BookRoom {},
            #[route("/cancel-booking")]
            CancelBooking {},
            #[route("/reschedule-booking")]
            RescheduleBooking {},
        #[end_layout]
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

impl Route {
    /// Screen this route shows; `None` for unknown paths.
    pub fn screen(&self) -> Option<Screen> {
        match self {
            Route::Welcome {} => Some(Screen::Welcome),
            Route::Home {} => Some(Screen::Home),
            Route::BookedRooms {} => Some(Screen::BookedRooms),
            Route::BookRoom {} => Some(Screen::BookRoom),
            Route::CancelBooking {} => Some(Screen::CancelBooking),
            Route::RescheduleBooking {} => Some(Screen::RescheduleBooking),
            Route::NotFound { .. } => None,
        }
    }

    pub fn for_screen(screen: Screen) -> Route {
        match screen {
            Screen::Welcome => Route::Welcome {},
            Screen::Home => Route::Home {},
            Screen::BookedRooms => Route::BookedRooms {},
            Screen::BookRoom => Route::BookRoom {},
            Screen::CancelBooking => Route::CancelBooking {},
            Screen::RescheduleBooking => Route::RescheduleBooking {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREENS: [Screen; 6] = [
        Screen::Welcome,
        Screen::Home,
        Screen::BookedRooms,
        Screen::BookRoom,
        Screen::CancelBooking,
        Screen::RescheduleBooking,
    ];

    #[test]
    fn test_routes_match_screen_paths() {
        for screen in SCREENS {
            let route = Route::for_screen(screen);
            assert_eq!(route.to_string(), screen.path());
            assert_eq!(route.screen(), Some(screen));
        }
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let route: Route = "/nowhere/else".parse().unwrap();
        assert_eq!(route.screen(), None);
        assert!(matches!(route, Route::NotFound { .. }));
    }

    #[test]
    fn test_exact_paths_parse_to_screens() {
        let route: Route = "/booked-rooms".parse().unwrap();
        assert_eq!(route, Route::BookedRooms {});
    }
}
