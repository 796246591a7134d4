//! Signed-in client session.
//!
//! A [`Session`] is created by a successful login, read by the booking
//! screens, and destroyed on logout. It lives for one browser tab: the web
//! build persists it in `sessionStorage` so a reload keeps the user signed
//! in, under the same keys the backend-facing pages have always used.

use roomfinder_protocol::{Client, ProfilePhoto};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CLIENT_ID_KEY: &str = "client_id";
pub const CLIENT_NAME_KEY: &str = "client_name";
pub const PROFILE_PHOTO_KEY: &str = "profile_photo";

/// Tab-scoped key/value storage backing a session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for server-side rendering and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub client_id: String,
    pub client_name: String,
    /// Stable profile photo URL; `None` when the client has no photo
    pub profile_photo: Option<String>,
}

impl Session {
    pub fn new(
        client_id: impl Into<String>,
        client_name: impl Into<String>,
        profile_photo: Option<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_name: client_name.into(),
            profile_photo: profile_photo.filter(|url| !url.is_empty()),
        }
    }

    /// Session from a login response and the optional photo lookup.
    pub fn from_login(profile: &Client, photo: Option<&ProfilePhoto>) -> Self {
        Session::new(
            profile.id_number.clone(),
            profile.name.clone(),
            photo.map(|p| p.photo_url.clone()),
        )
    }

    /// Restore a session; `None` unless a client id is stored.
    pub fn load(store: &impl SessionStore) -> Option<Session> {
        let client_id = store.get(CLIENT_ID_KEY).filter(|id| !id.is_empty())?;
        Some(Session::new(
            client_id,
            store.get(CLIENT_NAME_KEY).unwrap_or_default(),
            store.get(PROFILE_PHOTO_KEY),
        ))
    }

    pub fn save(&self, store: &mut impl SessionStore) {
        store.set(CLIENT_ID_KEY, &self.client_id);
        store.set(CLIENT_NAME_KEY, &self.client_name);
        match &self.profile_photo {
            Some(url) => store.set(PROFILE_PHOTO_KEY, url),
            None => store.remove(PROFILE_PHOTO_KEY),
        }
    }

    /// Remove every session field from `store`.
    pub fn clear(store: &mut impl SessionStore) {
        store.remove(CLIENT_ID_KEY);
        store.remove(CLIENT_NAME_KEY);
        store.remove(PROFILE_PHOTO_KEY);
    }
}
