//! Context shared by every screen: session, configuration, API client and
//! typed navigation.

use dioxus::prelude::*;
use dioxus::router::Navigator;

use super::browser;
use super::Route;
use crate::api::{ApiClient, DefaultTransport, Rejection};
use crate::config::ClientConfig;
use crate::navigator::{transition, NavEvent, Screen, SessionEffect, ViewState};
use crate::session::Session;

pub type Api = ApiClient<DefaultTransport>;

#[derive(Debug, Clone, Default, PartialEq)]
struct SessionState {
    session: Option<Session>,
    /// False until tab storage has been read (never on the server)
    ready: bool,
}

/// Handle to the signed-in session.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionHandle {
    state: Signal<SessionState>,
}

impl SessionHandle {
    pub fn current(&self) -> Option<Session> {
        self.state.read().session.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().ready
    }

    pub fn sign_in(&mut self, session: Session) {
        session.save(&mut browser::tab_store());
        tracing::info!(client_id = %session.client_id, "Session started");
        self.state.set(SessionState {
            session: Some(session),
            ready: true,
        });
    }

    pub fn sign_out(&mut self) {
        Session::clear(&mut browser::tab_store());
        tracing::info!("Session cleared");
        self.state.set(SessionState {
            session: None,
            ready: true,
        });
    }
}

/// Install session, config and API client contexts. Call once at the root.
pub fn use_app_context(config: ClientConfig) {
    let mut state = use_signal(SessionState::default);

    // Tab storage only exists in the browser; effects never run on the server
    use_effect(move || {
        if !state.peek().ready {
            let session = Session::load(&browser::tab_store());
            state.set(SessionState {
                session,
                ready: true,
            });
        }
    });

    use_context_provider(|| SessionHandle { state });
    use_context_provider(|| Api::new(&config.api_base, DefaultTransport::default()));
    use_context_provider(|| config);
}

pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
}

pub fn use_client_config() -> ClientConfig {
    use_context::<ClientConfig>()
}

pub fn use_api() -> Api {
    use_context::<Api>()
}

/// Typed navigation from one screen.
#[derive(Clone, Copy)]
pub struct Navigate {
    from: Screen,
    session: SessionHandle,
    navigator: Navigator,
}

impl Navigate {
    /// Apply `event` and return the screen that is now active.
    pub fn go(mut self, event: NavEvent) -> Screen {
        let t = transition(self.from, event);
        tracing::debug!(from = ?self.from, to = ?t.to, ?event, "Navigate");
        if t.session == SessionEffect::Clear {
            self.session.sign_out();
        }
        if t.view_state == ViewState::Discard {
            let _ = self.navigator.push(Route::for_screen(t.to));
        }
        t.to
    }
}

pub fn use_navigate(from: Screen) -> Navigate {
    Navigate {
        from,
        session: use_session(),
        navigator: use_navigator(),
    }
}

/// Surface a failed request: conflicts as an alert (`conflict_alert`, or the
/// backend's message when `None`), everything else inline.
pub fn report(rejection: Rejection, conflict_alert: Option<&str>, mut error: Signal<Option<String>>) {
    match rejection {
        Rejection::Conflict(detail) => {
            tracing::debug!("Conflict: {}", detail);
            browser::alert(conflict_alert.unwrap_or(&detail));
        }
        Rejection::Failed(e) => {
            tracing::warn!("Request failed: {}", e);
            error.set(Some(e.to_string()));
        }
    }
}
