//! Server configuration, read from the environment once at start-up.
//!
//! | variable                   | default                                   |
//! |----------------------------|-------------------------------------------|
//! | `INVITE_HOST`              | `127.0.0.1`                               |
//! | `INVITE_PORT`              | `8080`                                    |
//! | `INVITE_OPEN_BROWSER`      | `true`                                    |
//! | `INVITE_UPLOAD_ENDPOINT`   | `http://localhost:4000/api/upload-image`  |
//! | `INVITE_GENERATE_ENDPOINT` | `http://localhost:4000/api/generate-links`|
//! | `INVITE_OPEN_DELAY_MS`     | `700`                                     |
//!
//! Unparsable values, and a zero open delay, are logged and replaced by their
//! default.

use common::config::ClientConfig;
use log::warn;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Open the app in the default browser once the server is up.
    pub open_browser: bool,
    /// Settings handed to the frontend through `GET /api/config`.
    pub client: ClientConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ClientConfig::default();
        Self {
            host: lookup("INVITE_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "INVITE_PORT", 8080),
            open_browser: parse_or(&lookup, "INVITE_OPEN_BROWSER", true),
            client: ClientConfig {
                upload_endpoint: lookup("INVITE_UPLOAD_ENDPOINT")
                    .unwrap_or(defaults.upload_endpoint),
                generate_endpoint: lookup("INVITE_GENERATE_ENDPOINT")
                    .unwrap_or(defaults.generate_endpoint),
                open_delay_ms: parse_delay_or(&lookup, "INVITE_OPEN_DELAY_MS", defaults.open_delay_ms),
            },
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

/// Like [`parse_or`], but a zero delay would stack every open on the same
/// instant and is replaced by the default as well.
fn parse_delay_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match parse_or(lookup, key, default) {
        0 => {
            warn!("ignoring {}=0, opens need a positive delay", key);
            default
        }
        delay => delay,
    }
}
