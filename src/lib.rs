//! Room Finder web front end
//!
//! A browser front end for the Room Finder booking backend:
//! - Sign-in and registration with an optional profile photo
//! - Two-step room booking (quote, then pay) and rescheduling
//! - Booking cancellation with refund display
//! - A live bookings list over a STOMP WebSocket channel
//! - Web UI (Dioxus fullstack + Pico CSS)

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

// Dioxus UI app (shared between server SSR and WASM client)
pub mod app;

// Backend request layer and flows (shared)
pub mod api;
pub mod booking;
pub mod config;
pub mod feed;
pub mod identity;
pub mod navigator;
pub mod session;

// Server-only modules (excluded from WASM build)
#[cfg(feature = "server")]
pub mod server;

pub use api::{ApiClient, ApiError, Outcome};
pub use config::ClientConfig;
pub use session::Session;
