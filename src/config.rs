//! Client configuration
//!
//! The backend location is fixed at build time by default and can be
//! overridden on the server (config file or `ROOMFINDER_*` environment
//! variables). The browser fetches the effective values once at start-up.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

/// Backend base URL used when nothing else is configured
pub const DEFAULT_API_BASE: &str = match option_env!("ROOMFINDER_API_BASE") {
    Some(base) => base,
    None => "http://localhost:8080",
};

/// Raw WebSocket endpoint of the backend's STOMP broker
pub const DEFAULT_CHANNEL_PATH: &str = "/ws/websocket";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_channel_path")]
    pub channel_path: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_channel_path() -> String {
    DEFAULT_CHANNEL_PATH.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            channel_path: default_channel_path(),
        }
    }
}

impl ClientConfig {
    /// WebSocket URL of the bookings channel (`http` -> `ws`, `https` -> `wss`).
    pub fn channel_url(&self) -> Result<String, url::ParseError> {
        let mut url = url::Url::parse(&self.api_base)?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http/https -> ws/wss is always a permitted scheme change
        let _ = url.set_scheme(scheme);
        let path = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            self.channel_path.trim_start_matches('/')
        );
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url.to_string())
    }

    /// Value for the STOMP `host` header (`host[:port]` of the backend).
    pub fn channel_host(&self) -> String {
        url::Url::parse(&self.api_base)
            .ok()
            .and_then(|url| {
                let host = url.host_str()?.to_string();
                Some(match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host,
                })
            })
            .unwrap_or_else(|| "localhost".to_string())
    }
}

/// Name of the optional server-side config file (`roomfinder.toml`, `.json`, ...)
#[cfg(feature = "server")]
pub const CONFIG_FILE: &str = "roomfinder";

/// Load configuration: defaults, then the config file, then `ROOMFINDER_*` env vars.
#[cfg(feature = "server")]
pub fn load_config() -> anyhow::Result<ClientConfig> {
    load_config_from(std::path::Path::new(CONFIG_FILE))
}

#[cfg(feature = "server")]
pub fn load_config_from(file: &std::path::Path) -> anyhow::Result<ClientConfig> {
    let config = ::config::Config::builder()
        .set_default("api_base", DEFAULT_API_BASE)?
        .set_default("channel_path", DEFAULT_CHANNEL_PATH)?
        .add_source(::config::File::with_name(&file.to_string_lossy()).required(false))
        // ROOMFINDER_API_BASE, ROOMFINDER_CHANNEL_PATH
        .add_source(::config::Environment::with_prefix("ROOMFINDER").try_parsing(true))
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Effective client configuration as seen by the server.
#[cfg(feature = "server")]
#[get("/client-config")]
pub async fn fetch_client_config() -> Result<ClientConfig, ServerFnError> {
    load_config().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        ServerFnError::new(e.to_string())
    })
}

#[cfg(not(feature = "server"))]
#[get("/client-config")]
pub async fn fetch_client_config() -> Result<ClientConfig, ServerFnError> {
    Ok(ClientConfig::default())
}
