//! Screen resolution and navigation transitions.
//!
//! A path resolves to exactly one [`Screen`] through a fixed table checked in
//! order: `/` matches only itself, every other entry matches its path and
//! anything below it (`/home`, `/home/`, `/home/x`, but not `/homes`).
//!
//! Moving between screens goes through [`transition`], which says where to
//! go, what happens to the session, and whether the current screen's local
//! state survives.

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Welcome,
    Home,
    BookedRooms,
    BookRoom,
    CancelBooking,
    RescheduleBooking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    Exact,
    Prefix,
}

const ROUTE_TABLE: [(&str, Match, Screen); 6] = [
    ("/", Match::Exact, Screen::Welcome),
    ("/home", Match::Prefix, Screen::Home),
    ("/booked-rooms", Match::Prefix, Screen::BookedRooms),
    ("/book-room", Match::Prefix, Screen::BookRoom),
    ("/cancel-booking", Match::Prefix, Screen::CancelBooking),
    ("/reschedule-booking", Match::Prefix, Screen::RescheduleBooking),
];

impl Screen {
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Welcome => "/",
            Screen::Home => "/home",
            Screen::BookedRooms => "/booked-rooms",
            Screen::BookRoom => "/book-room",
            Screen::CancelBooking => "/cancel-booking",
            Screen::RescheduleBooking => "/reschedule-booking",
        }
    }

    /// Resolve a location path (query and fragment ignored); first match wins.
    pub fn resolve(location: &str) -> Option<Screen> {
        let path = location
            .split(['?', '#'])
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("/");

        ROUTE_TABLE
            .iter()
            .find(|(pattern, kind, _)| match kind {
                Match::Exact => path == *pattern,
                Match::Prefix => path
                    .strip_prefix(pattern)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
            })
            .map(|(_, _, screen)| *screen)
    }

    /// Everything except the entry screen needs a signed-in client.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Screen::Welcome)
    }
}

/// Screen to actually show for `requested` given the current session.
pub fn gate(requested: Screen, session: Option<&Session>) -> Screen {
    if requested.requires_session() && session.is_none() {
        Screen::Welcome
    } else {
        requested
    }
}

/// Navigation-triggering events raised by screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    SignedIn,
    Registered,
    SignedOut,
    ViewBookings,
    StartBooking,
    StartCancellation,
    StartReschedule,
    GoHome,
    PaymentConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    Keep,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Stay mounted; local state (form fields, quotes) is preserved
    Keep,
    /// Unmount the current screen; local state is dropped
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: Screen,
    pub session: SessionEffect,
    pub view_state: ViewState,
}

/// Decide the transition for `event` raised on screen `from`.
pub fn transition(from: Screen, event: NavEvent) -> Transition {
    let (to, session) = match event {
        NavEvent::SignedIn => (Screen::Home, SessionEffect::Keep),
        NavEvent::Registered => (Screen::Welcome, SessionEffect::Keep),
        NavEvent::SignedOut => (Screen::Welcome, SessionEffect::Clear),
        NavEvent::ViewBookings => (Screen::BookedRooms, SessionEffect::Keep),
        NavEvent::StartBooking => (Screen::BookRoom, SessionEffect::Keep),
        NavEvent::StartCancellation => (Screen::CancelBooking, SessionEffect::Keep),
        NavEvent::StartReschedule => (Screen::RescheduleBooking, SessionEffect::Keep),
        NavEvent::GoHome => (Screen::Home, SessionEffect::Keep),
        NavEvent::PaymentConfirmed => (Screen::BookedRooms, SessionEffect::Keep),
    };
    let view_state = if to == from && session == SessionEffect::Keep {
        ViewState::Keep
    } else {
        ViewState::Discard
    };
    Transition {
        to,
        session,
        view_state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_root() {
        assert_eq!(Screen::resolve("/"), Some(Screen::Welcome));
        assert_eq!(Screen::resolve(""), Some(Screen::Welcome));
        assert_eq!(Screen::resolve("/?next=home"), Some(Screen::Welcome));
        assert_eq!(Screen::resolve("/unknown"), None);
    }

    #[test]
    fn test_resolve_prefix_segments() {
        assert_eq!(Screen::resolve("/home"), Some(Screen::Home));
        assert_eq!(Screen::resolve("/home/"), Some(Screen::Home));
        assert_eq!(Screen::resolve("/home/settings"), Some(Screen::Home));
        assert_eq!(Screen::resolve("/homes"), None);
        assert_eq!(Screen::resolve("/book-room#top"), Some(Screen::BookRoom));
        assert_eq!(Screen::resolve("/booked-rooms/7"), Some(Screen::BookedRooms));
    }

    #[test]
    fn test_every_screen_path_resolves_to_itself() {
        for (_, _, screen) in ROUTE_TABLE {
            assert_eq!(Screen::resolve(screen.path()), Some(screen));
        }
    }

    #[test]
    fn test_gate_redirects_without_session() {
        let session = Session::new("1", "Ann", None);
        assert_eq!(gate(Screen::Home, None), Screen::Welcome);
        assert_eq!(gate(Screen::BookRoom, None), Screen::Welcome);
        assert_eq!(gate(Screen::Welcome, None), Screen::Welcome);
        assert_eq!(gate(Screen::BookRoom, Some(&session)), Screen::BookRoom);
    }

    #[test]
    fn test_transitions() {
        let t = transition(Screen::BookRoom, NavEvent::PaymentConfirmed);
        assert_eq!(t.to, Screen::BookedRooms);
        assert_eq!(t.session, SessionEffect::Keep);
        assert_eq!(t.view_state, ViewState::Discard);

        let t = transition(Screen::Home, NavEvent::SignedOut);
        assert_eq!(t.to, Screen::Welcome);
        assert_eq!(t.session, SessionEffect::Clear);

        assert_eq!(transition(Screen::Welcome, NavEvent::SignedIn).to, Screen::Home);
    }

    #[test]
    fn test_registration_keeps_entry_screen_state() {
        let t = transition(Screen::Welcome, NavEvent::Registered);
        assert_eq!(t.to, Screen::Welcome);
        assert_eq!(t.view_state, ViewState::Keep);
    }
}
