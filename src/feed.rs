//! Live bookings feed.
//!
//! [`BookingsChannel`] drives one STOMP session over a text socket:
//!
//! ```text
//!   open      -> CONNECT
//!   CONNECTED -> SUBSCRIBE /topic/bookings   (once)
//!             -> SEND /app/get-bookings      (once)
//!   MESSAGE   -> snapshot replaces the list
//!   release   -> UNSUBSCRIBE, DISCONNECT, close
//! ```
//!
//! A channel is acquired once when the bookings screen mounts and released
//! when it unmounts (or when the channel is dropped). Repeated CONNECTED
//! frames never re-issue the subscription or the bookings request.

use roomfinder_protocol::{BookedRoom, Command, Frame, FrameError};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const BOOKINGS_TOPIC: &str = "/topic/bookings";
pub const GET_BOOKINGS_DESTINATION: &str = "/app/get-bookings";
pub const SUBSCRIPTION_ID: &str = "sub-0";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    #[error("channel send failed: {0}")]
    Send(String),

    #[error("malformed frame: {0}")]
    Frame(#[from] FrameError),

    #[error("unreadable bookings snapshot: {0}")]
    Snapshot(String),

    #[error("broker error: {0}")]
    Broker(String),
}

/// Outgoing half of a text socket.
pub trait ChannelSink {
    fn send_text(&mut self, text: &str) -> Result<(), FeedError>;
    fn close(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Connected,
    /// Full replacement of the bookings list
    Snapshot(Vec<BookedRoom>),
    Error(FeedError),
    Closed,
}

pub struct BookingsChannel<S: ChannelSink> {
    sink: Option<S>,
    host: String,
    connected: bool,
    subscribed: bool,
    requested: bool,
    socket_closed: bool,
}

impl<S: ChannelSink> BookingsChannel<S> {
    /// Wrap a socket. `host` is the STOMP virtual host (`host[:port]`).
    pub fn new(sink: S, host: impl Into<String>) -> Self {
        Self {
            sink: Some(sink),
            host: host.into(),
            connected: false,
            subscribed: false,
            requested: false,
            socket_closed: false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.sink.is_none()
    }

    /// Whether the one-time bookings request has gone out.
    pub fn has_requested(&self) -> bool {
        self.requested
    }

    /// Socket opened: start the STOMP session.
    pub fn on_open(&mut self) -> Vec<FeedEvent> {
        debug!(host = %self.host, "Bookings channel open, connecting");
        let frame = Frame::connect(&self.host);
        self.send(&frame).err().map(FeedEvent::Error).into_iter().collect()
    }

    /// Handle one text message from the socket (may hold several frames).
    pub fn on_text(&mut self, text: &str) -> Vec<FeedEvent> {
        let frames = match Frame::decode_all(text) {
            Ok(frames) => frames,
            Err(e) => {
                warn!("Undecodable channel message: {}", e);
                return vec![FeedEvent::Error(e.into())];
            }
        };

        let mut events = Vec::new();
        for frame in frames {
            match frame.command {
                Command::Connected => events.extend(self.on_connected()),
                Command::Message => events.extend(self.on_message(&frame)),
                Command::Error => {
                    let detail = frame
                        .get("message")
                        .map(str::to_string)
                        .unwrap_or_else(|| frame.body.clone());
                    warn!("Broker error: {}", detail);
                    events.push(FeedEvent::Error(FeedError::Broker(detail)));
                }
                other => debug!(command = %other, "Ignoring channel frame"),
            }
        }
        events
    }

    /// The socket closed from the other side.
    pub fn on_closed(&mut self) -> FeedEvent {
        info!("Bookings channel closed");
        self.socket_closed = true;
        self.connected = false;
        FeedEvent::Closed
    }

    /// End the session and close the socket. Safe to call more than once.
    pub fn release(&mut self) {
        let Some(mut sink) = self.sink.take() else {
            return;
        };
        if self.connected && !self.socket_closed {
            let mut goodbye = Vec::new();
            if self.subscribed {
                goodbye.push(Frame::unsubscribe(SUBSCRIPTION_ID));
            }
            goodbye.push(Frame::disconnect());
            for frame in goodbye {
                if let Err(e) = sink.send_text(&frame.encode()) {
                    debug!("Send during release failed: {}", e);
                    break;
                }
            }
        }
        sink.close();
        self.connected = false;
        info!("Bookings channel released");
    }

    fn on_connected(&mut self) -> Vec<FeedEvent> {
        self.connected = true;
        let mut events = vec![FeedEvent::Connected];

        if !self.subscribed {
            match self.send(&Frame::subscribe(SUBSCRIPTION_ID, BOOKINGS_TOPIC)) {
                Ok(()) => self.subscribed = true,
                Err(e) => {
                    events.push(FeedEvent::Error(e));
                    return events;
                }
            }
        }
        if !self.requested {
            match self.send(&Frame::send(GET_BOOKINGS_DESTINATION, "")) {
                Ok(()) => {
                    self.requested = true;
                    debug!("Requested current bookings");
                }
                Err(e) => events.push(FeedEvent::Error(e)),
            }
        }
        events
    }

    fn on_message(&self, frame: &Frame) -> Option<FeedEvent> {
        let ours = frame.get("subscription") == Some(SUBSCRIPTION_ID)
            || frame.get("destination") == Some(BOOKINGS_TOPIC);
        if !ours {
            debug!(destination = ?frame.get("destination"), "Message for another subscription");
            return None;
        }
        let event = match BookedRoom::parse_snapshot(&frame.body) {
            Ok(rooms) => {
                debug!(count = rooms.len(), "Bookings snapshot");
                FeedEvent::Snapshot(rooms)
            }
            Err(e) => {
                warn!("Unreadable bookings snapshot: {}", e);
                FeedEvent::Error(FeedError::Snapshot(e.to_string()))
            }
        };
        Some(event)
    }

    fn send(&mut self, frame: &Frame) -> Result<(), FeedError> {
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| FeedError::Send("channel released".to_string()))?;
        sink.send_text(&frame.encode())
    }
}

impl<S: ChannelSink> Drop for BookingsChannel<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// What the bookings screen renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub rooms: Vec<BookedRoom>,
    pub connected: bool,
    pub error: Option<String>,
}

impl FeedState {
    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Connected => {
                self.connected = true;
                self.error = None;
            }
            FeedEvent::Snapshot(rooms) => {
                self.rooms = rooms;
                self.error = None;
            }
            FeedEvent::Error(e) => self.error = Some(e.to_string()),
            FeedEvent::Closed => self.connected = false,
        }
    }
}
