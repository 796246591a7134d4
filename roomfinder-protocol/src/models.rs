//! HTTP request/response bodies and bookings feed items.
//!
//! The backend serialises identifiers as JSON numbers in some places and
//! strings in others. The front end never does arithmetic on them, so every
//! identifier is held as an opaque string.

use serde::{Deserialize, Deserializer, Serialize};

/// Client profile as returned by login and sent on registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// National ID number, used as the client identifier
    #[serde(deserialize_with = "opaque_id")]
    pub id_number: String,

    /// Given name
    pub name: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub surname: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub email_address: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub phone_number: String,
}

/// Association between a client and their profile photo.
///
/// Returned by `get-profile-pic` and sent to `upload-profile-pic`. An empty
/// `photo_url` means "no photo".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePhoto {
    #[serde(default, deserialize_with = "opaque_id")]
    pub client_id: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub photo_url: String,
}

/// Quote request for a single date.
///
/// `date` is whatever the date input produced; it is never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: String,
    pub client_id: String,
}

/// Payment confirmation for a previously quoted booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub client_id: String,
    pub date: String,
    pub price: f64,
}

/// Price quote returned by `book-room` and `reschedule-booking`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPrice {
    pub room_price: f64,
}

/// One entry of the bookings snapshot pushed on `/topic/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedRoom {
    #[serde(alias = "start_date")]
    pub date: String,

    #[serde(default)]
    pub booking_id: i64,
}

impl BookedRoom {
    /// Parse a full snapshot message body.
    pub fn parse_snapshot(body: &str) -> Result<Vec<BookedRoom>, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Row label shown in the bookings list.
    pub fn label(&self) -> String {
        format!("- {}", self.date)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IdRepr>::deserialize(deserializer)? {
        Some(IdRepr::Text(s)) => s,
        Some(IdRepr::Integer(n)) => n.to_string(),
        Some(IdRepr::Float(f)) => f.to_string(),
        None => String::new(),
    })
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
