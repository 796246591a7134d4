//! Scoped bookings channel for the BookedRooms screen.

use dioxus::prelude::*;

use super::browser;
use super::context::use_client_config;
use crate::feed::FeedState;

/// Open the bookings channel once for the lifetime of the calling
/// component and close it when the component unmounts.
///
/// Re-renders reuse the same channel; the returned signal carries the latest
/// snapshot.
pub fn use_bookings_feed() -> Signal<FeedState> {
    let config = use_client_config();
    let state = use_signal(FeedState::default);

    let handle = use_hook(move || browser::open_bookings_channel(&config, state));

    use_drop(move || {
        tracing::debug!("Bookings screen unmounted");
        handle.release();
    });

    state
}
