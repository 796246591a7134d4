//! Page components, one per screen.

mod book_room;
mod booked_rooms;
mod cancel_booking;
mod home;
mod not_found;
mod reschedule_booking;
mod welcome;

pub use book_room::BookRoom;
pub use booked_rooms::BookedRooms;
pub use cancel_booking::CancelBooking;
pub use home::Home;
pub use not_found::NotFound;
pub use reschedule_booking::RescheduleBooking;
pub use welcome::Welcome;
