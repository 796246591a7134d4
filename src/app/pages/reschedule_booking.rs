use dioxus::prelude::*;

use super::book_room::QuotePayFlow;
use crate::navigator::Screen;

/// Move an existing booking to a new date (quote, then pay the difference).
#[component]
pub fn RescheduleBooking() -> Element {
    rsx! {
        QuotePayFlow { from: Screen::RescheduleBooking, reschedule: true }
    }
}
