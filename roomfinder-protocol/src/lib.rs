//! Shared wire protocol types for the Room Finder front end.
//!
//! This crate defines what crosses the boundary between the browser UI and
//! the booking backend:
//! - REST request and response bodies
//! - STOMP frames carried over the bookings channel
//!
//! # Modules
//! - [`models`] - HTTP request/response bodies and feed items
//! - [`stomp`] - STOMP 1.2 text frame encoding and decoding

pub mod models;
pub mod stomp;

pub use models::{
    BookedRoom, BookingRequest, Client, PaymentRequest, ProfilePhoto, RoomPrice,
};
pub use stomp::{Command, Frame, FrameError};
