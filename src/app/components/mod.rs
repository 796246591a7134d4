//! Shared UI components.

pub mod gate;
pub mod layout;

pub use gate::SessionGate;
pub use layout::{ErrorLine, Panel, Shell};
