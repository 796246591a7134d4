//! Browser glue: alerts, tab-scoped storage and the bookings WebSocket.
//!
//! Everything here has a native fallback so server-side rendering compiles
//! and runs; the fallbacks only log.

use crate::config::ClientConfig;
use crate::feed::FeedState;
use dioxus::prelude::*;

/// Blocking user-facing alert.
pub fn alert(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!(message, "alert");
}

/// Log a failed storage operation; returns whether it succeeded.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn storage_ok<E>(op: &str, key: &str, result: Result<(), E>) -> bool {
    if result.is_err() {
        tracing::warn!(key, op, "sessionStorage operation failed");
    }
    result.is_ok()
}

/// `sessionStorage`-backed session store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSessionStore;

#[cfg(target_arch = "wasm32")]
impl BrowserSessionStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.session_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl crate::session::SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            storage_ok("set", key, storage.set_item(key, value));
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = Self::storage() {
            storage_ok("remove", key, storage.remove_item(key));
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub type TabStore = BrowserSessionStore;

#[cfg(not(target_arch = "wasm32"))]
pub type TabStore = crate::session::MemoryStore;

pub fn tab_store() -> TabStore {
    TabStore::default()
}

/// Keeps an open bookings channel and its socket callbacks alive.
///
/// Cloning shares the same channel; [`ChannelHandle::release`] closes it for
/// every clone.
#[derive(Clone)]
pub struct ChannelHandle {
    #[cfg(target_arch = "wasm32")]
    inner: Option<std::rc::Rc<ws::Connection>>,
}

impl ChannelHandle {
    fn inert() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            inner: None,
        }
    }

    pub fn release(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(connection) = &self.inner {
            connection.release();
        }
    }
}

/// Open the bookings channel, feeding events into `state`.
pub fn open_bookings_channel(config: &ClientConfig, state: Signal<FeedState>) -> ChannelHandle {
    #[cfg(target_arch = "wasm32")]
    {
        match ws::Connection::open(config, state) {
            Ok(connection) => ChannelHandle {
                inner: Some(std::rc::Rc::new(connection)),
            },
            Err(e) => {
                tracing::warn!("Could not open bookings channel: {}", e);
                let mut state = state;
                state.with_mut(|s| s.error = Some(e));
                ChannelHandle::inert()
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = state;
        tracing::debug!(api_base = %config.api_base, "No bookings channel outside the browser");
        ChannelHandle::inert()
    }
}

#[cfg(target_arch = "wasm32")]
mod ws {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dioxus::prelude::*;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

    use crate::config::ClientConfig;
    use crate::feed::{BookingsChannel, ChannelSink, FeedError, FeedEvent, FeedState};

    pub struct WebSocketSink {
        socket: WebSocket,
    }

    impl ChannelSink for WebSocketSink {
        fn send_text(&mut self, text: &str) -> Result<(), FeedError> {
            self.socket
                .send_with_str(text)
                .map_err(|e| FeedError::Send(format!("{:?}", e)))
        }

        fn close(&mut self) {
            self.socket.set_onopen(None);
            self.socket.set_onmessage(None);
            self.socket.set_onclose(None);
            let _ = self.socket.close();
        }
    }

    type SharedChannel = Rc<RefCell<BookingsChannel<WebSocketSink>>>;

    pub struct Connection {
        channel: SharedChannel,
        _on_open: Closure<dyn FnMut(Event)>,
        _on_message: Closure<dyn FnMut(MessageEvent)>,
        _on_close: Closure<dyn FnMut(CloseEvent)>,
    }

    fn dispatch(mut state: Signal<FeedState>, events: Vec<FeedEvent>) {
        if events.is_empty() {
            return;
        }
        state.with_mut(|s| {
            for event in events {
                s.apply(event);
            }
        });
    }

    impl Connection {
        pub fn open(config: &ClientConfig, state: Signal<FeedState>) -> Result<Self, String> {
            let url = config.channel_url().map_err(|e| e.to_string())?;
            let socket = WebSocket::new(&url).map_err(|e| format!("{:?}", e))?;
            tracing::info!(url = %url, "Opening bookings channel");

            let channel: SharedChannel = Rc::new(RefCell::new(BookingsChannel::new(
                WebSocketSink {
                    socket: socket.clone(),
                },
                config.channel_host(),
            )));

            let on_open = {
                let channel = channel.clone();
                Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                    if let Ok(mut channel) = channel.try_borrow_mut() {
                        dispatch(state, channel.on_open());
                    }
                })
            };
            let on_message = {
                let channel = channel.clone();
                Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
                    let Some(text) = event.data().as_string() else {
                        tracing::debug!("Ignoring non-text channel message");
                        return;
                    };
                    if let Ok(mut channel) = channel.try_borrow_mut() {
                        dispatch(state, channel.on_text(&text));
                    }
                })
            };
            let on_close = {
                let channel = channel.clone();
                Closure::<dyn FnMut(CloseEvent)>::new(move |_: CloseEvent| {
                    if let Ok(mut channel) = channel.try_borrow_mut() {
                        dispatch(state, vec![channel.on_closed()]);
                    }
                })
            };

            socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
            socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
            socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

            Ok(Self {
                channel,
                _on_open: on_open,
                _on_message: on_message,
                _on_close: on_close,
            })
        }

        pub fn release(&self) {
            match self.channel.try_borrow_mut() {
                Ok(mut channel) => channel.release(),
                Err(_) => tracing::warn!("Bookings channel busy during release"),
            }
        }
    }
}
