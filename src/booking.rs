//! Quote-then-pay booking flow and cancellation.
//!
//! BookRoom and RescheduleBooking share one two-step state machine:
//!
//! ```text
//!   Booking --quote ok--> Payment(quote) --paid--> (navigate to booked rooms)
//!      ^                      |
//!      +-------cancel---------+
//! ```
//!
//! The date is carried as the exact string the date input produced. It is
//! shown and sent back verbatim, never parsed.

use roomfinder_protocol::{BookingRequest, PaymentRequest, RoomPrice};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, Outcome, Transport};
use crate::navigator::Screen;

pub const CONFLICT_ALERT: &str = "Room already booked for requested date";
pub const PAYMENT_SUCCESS_ALERT: &str = "Payment successful";

/// Transient price quote for one date
#[derive(Debug, Clone, PartialEq)]
pub struct BookingQuote {
    pub date: String,
    pub price: f64,
}

impl BookingQuote {
    pub fn confirm_line(&self) -> String {
        format!("Confirm date: {}", self.date)
    }

    pub fn price_line(&self) -> String {
        format!("Price for booking: ${}", self.price)
    }
}

/// What a screen should do after a state machine step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    /// Blocking alert text
    pub alert: Option<String>,
    /// Inline error line
    pub error: Option<String>,
    pub navigate_to: Option<Screen>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn alert(text: &str) -> Self {
        Self {
            alert: Some(text.to_string()),
            ..Self::default()
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            error: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum BookingStep {
    #[default]
    Booking,
    Payment(BookingQuote),
}

impl BookingStep {
    pub fn quote(&self) -> Option<&BookingQuote> {
        match self {
            BookingStep::Payment(quote) => Some(quote),
            BookingStep::Booking => None,
        }
    }

    /// Apply the result of a quote request for `date`.
    pub fn on_quote(&mut self, date: &str, outcome: Outcome<RoomPrice>) -> Reaction {
        if !matches!(self, BookingStep::Booking) {
            warn!("Quote result arrived outside the booking step; ignored");
            return Reaction::none();
        }
        match outcome {
            Outcome::Success(price) => {
                debug!(date, price = price.room_price, "Quote received");
                *self = BookingStep::Payment(BookingQuote {
                    date: date.to_string(),
                    price: price.room_price,
                });
                Reaction::none()
            }
            Outcome::Conflict(msg) => {
                debug!(date, "Quote rejected: {}", msg);
                Reaction::alert(CONFLICT_ALERT)
            }
            Outcome::Failed(e) => Reaction::error(format!("Could not get a price: {}", e)),
        }
    }

    /// Apply the result of a payment request.
    pub fn on_payment(&mut self, outcome: Outcome<()>) -> Reaction {
        let Some(quote) = self.quote() else {
            warn!("Payment result arrived outside the payment step; ignored");
            return Reaction::none();
        };
        match outcome {
            Outcome::Success(()) => {
                info!(date = %quote.date, "Booking paid");
                *self = BookingStep::Booking;
                Reaction {
                    alert: Some(PAYMENT_SUCCESS_ALERT.to_string()),
                    error: None,
                    navigate_to: Some(Screen::BookedRooms),
                }
            }
            Outcome::Conflict(msg) => {
                debug!(date = %quote.date, "Payment rejected: {}", msg);
                Reaction::alert(CONFLICT_ALERT)
            }
            Outcome::Failed(e) => Reaction::error(format!("Payment failed: {}", e)),
        }
    }

    /// Back to the booking form, discarding any quote.
    pub fn cancel(&mut self) {
        *self = BookingStep::Booking;
    }
}

/// Which backend flow a quote/pay sequence runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingKind {
    New,
    Reschedule { booking_id: String },
}

impl BookingKind {
    pub async fn request_quote<T: Transport>(
        &self,
        api: &ApiClient<T>,
        client_id: &str,
        date: &str,
    ) -> Outcome<RoomPrice> {
        let request = BookingRequest {
            date: date.to_string(),
            client_id: client_id.to_string(),
        };
        match self {
            BookingKind::New => api.book_room(&request).await,
            BookingKind::Reschedule { booking_id } => {
                api.reschedule_booking(booking_id, &request).await
            }
        }
    }

    pub async fn pay<T: Transport>(
        &self,
        api: &ApiClient<T>,
        client_id: &str,
        quote: &BookingQuote,
    ) -> Outcome<()> {
        match self {
            BookingKind::New => {
                let request = PaymentRequest {
                    client_id: client_id.to_string(),
                    date: quote.date.clone(),
                    price: quote.price,
                };
                api.pay_for_booking(&request).await
            }
            BookingKind::Reschedule { booking_id } => {
                let request = BookingRequest {
                    date: quote.date.clone(),
                    client_id: client_id.to_string(),
                };
                api.pay_for_reschedule(booking_id, quote.price, &request).await
            }
        }
    }
}

/// Cancel a booking and describe the refund for display.
pub async fn cancel_booking<T: Transport>(
    api: &ApiClient<T>,
    booking_id: &str,
    client_id: &str,
) -> Outcome<String> {
    api.cancel_booking(booking_id, client_id).await.map(|response| {
        info!(booking_id, response = %response, "Booking cancelled");
        describe_refund(&response)
    })
}

/// "Refund amount: $X" for a numeric response, a generic line otherwise.
pub fn describe_refund(response: &serde_json::Value) -> String {
    match response.as_f64() {
        Some(amount) => format!("Refund amount: ${}", amount),
        None => "Booking cancelled".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, ScriptedTransport};
    use crate::api::{ApiError, HttpBody, Method};
    use tokio_test::block_on;

    fn quote() -> BookingQuote {
        BookingQuote {
            date: "2024-05-01".to_string(),
            price: 500.0,
        }
    }

    #[test]
    fn test_quote_success_moves_to_payment() {
        let api = client(ScriptedTransport::default().on(
            Method::Post,
            "/api/book-room",
            200,
            r#"{"room_price": 500}"#,
        ));
        let outcome = block_on(BookingKind::New.request_quote(&api, "123", "2024-05-01"));

        let mut step = BookingStep::default();
        let reaction = step.on_quote("2024-05-01", outcome);
        assert_eq!(reaction, Reaction::default());

        let quote = step.quote().unwrap();
        assert_eq!(quote.confirm_line(), "Confirm date: 2024-05-01");
        assert_eq!(quote.price_line(), "Price for booking: $500");
    }

    #[test]
    fn test_quote_keeps_date_verbatim() {
        let mut step = BookingStep::Booking;
        step.on_quote("01/05/2024 ", Outcome::Success(RoomPrice { room_price: 99.5 }));
        assert_eq!(
            step,
            BookingStep::Payment(BookingQuote {
                date: "01/05/2024 ".to_string(),
                price: 99.5
            })
        );
    }

    #[test]
    fn test_quote_conflict_stays_in_booking() {
        let mut step = BookingStep::Booking;
        let reaction = step.on_quote("2024-05-01", Outcome::Conflict("taken".to_string()));
        assert_eq!(step, BookingStep::Booking);
        assert!(step.quote().is_none());
        assert_eq!(reaction.alert.as_deref(), Some(CONFLICT_ALERT));
        assert_eq!(reaction.navigate_to, None);
    }

    #[test]
    fn test_quote_failure_is_inline_error() {
        let mut step = BookingStep::Booking;
        let reaction = step.on_quote(
            "2024-05-01",
            Outcome::Failed(ApiError::Transport("connection refused".to_string())),
        );
        assert_eq!(step, BookingStep::Booking);
        assert_eq!(reaction.alert, None);
        assert!(reaction.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn test_payment_created_navigates_and_discards_quote() {
        let api = client(ScriptedTransport::default().on(Method::Post, "/api/booking-payment", 201, ""));
        let mut step = BookingStep::Payment(quote());
        let outcome = block_on(BookingKind::New.pay(&api, "123", step.quote().unwrap()));
        let reaction = step.on_payment(outcome);

        assert_eq!(step, BookingStep::Booking);
        assert_eq!(reaction.alert.as_deref(), Some(PAYMENT_SUCCESS_ALERT));
        assert_eq!(reaction.navigate_to, Some(Screen::BookedRooms));
        assert_eq!(
            api.transport().calls()[0].body,
            HttpBody::Json(r#"{"client_id":"123","date":"2024-05-01","price":500.0}"#.to_string())
        );
    }

    #[test]
    fn test_payment_conflict_stays_in_payment() {
        let mut step = BookingStep::Payment(quote());
        let reaction = step.on_payment(Outcome::Conflict(String::new()));
        assert_eq!(step, BookingStep::Payment(quote()));
        assert_eq!(reaction.alert.as_deref(), Some(CONFLICT_ALERT));
        assert_eq!(reaction.navigate_to, None);
    }

    #[test]
    fn test_cancel_discards_quote() {
        let mut step = BookingStep::Payment(quote());
        step.cancel();
        assert_eq!(step, BookingStep::Booking);
    }

    #[test]
    fn test_results_for_the_wrong_step_are_ignored() {
        let mut step = BookingStep::Booking;
        assert_eq!(step.on_payment(Outcome::Success(())), Reaction::default());
        assert_eq!(step, BookingStep::Booking);

        let mut step = BookingStep::Payment(quote());
        step.on_quote("2030-01-01", Outcome::Success(RoomPrice { room_price: 1.0 }));
        assert_eq!(step, BookingStep::Payment(quote()));
    }

    #[test]
    fn test_reschedule_flow_uses_booking_id() {
        let api = client(
            ScriptedTransport::default()
                .on(Method::Post, "/api/reschedule-booking", 200, r#"{"room_price": 7.5}"#)
                .on(Method::Post, "/api/reschedule-payment", 201, ""),
        );
        let kind = BookingKind::Reschedule {
            booking_id: "4".to_string(),
        };
        let mut step = BookingStep::Booking;
        step.on_quote("2024-08-01", block_on(kind.request_quote(&api, "123", "2024-08-01")));
        let outcome = block_on(kind.pay(&api, "123", step.quote().unwrap()));
        assert_eq!(step.on_payment(outcome).navigate_to, Some(Screen::BookedRooms));
        assert_eq!(
            api.transport().urls(),
            vec![
                "http://backend.test/api/reschedule-booking?booking_id=4",
                "http://backend.test/api/reschedule-payment?booking_id=4&room_price=7.5",
            ]
        );
    }

    #[test]
    fn test_cancel_booking_describes_refund() {
        let api = client(ScriptedTransport::default().on(Method::Post, "/api/cancel-booking", 200, "250.0"));
        assert_eq!(
            block_on(cancel_booking(&api, "1", "123")),
            Outcome::Success("Refund amount: $250".to_string())
        );
    }

    #[test]
    fn test_describe_refund_non_numeric() {
        assert_eq!(describe_refund(&serde_json::json!({"ok": true})), "Booking cancelled");
        assert_eq!(describe_refund(&serde_json::json!(3.75)), "Refund amount: $3.75");
    }
}
