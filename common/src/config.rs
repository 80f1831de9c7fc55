//! Client-side configuration surface.
//!
//! The backend serves this structure on `GET /api/config`; the frontend fetches it
//! once on start-up and keeps [`ClientConfig::default`] when the request fails.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_UPLOAD_ENDPOINT: &str = "http://localhost:4000/api/upload-image";
pub const DEFAULT_GENERATE_ENDPOINT: &str = "http://localhost:4000/api/generate-links";

/// Milliseconds between two programmatic opens of the sequential dispatcher.
pub const DEFAULT_OPEN_DELAY_MS: u64 = 700;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Multipart endpoint receiving the optional invitation image.
    pub upload_endpoint: String,
    /// JSON endpoint turning recipients and a template into deep links.
    pub generate_endpoint: String,
    /// Delay between sequential opens, in milliseconds.
    #[serde(default = "default_open_delay_ms")]
    pub open_delay_ms: u64,
}

fn default_open_delay_ms() -> u64 {
    DEFAULT_OPEN_DELAY_MS
}

impl ClientConfig {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            generate_endpoint: DEFAULT_GENERATE_ENDPOINT.to_string(),
            open_delay_ms: DEFAULT_OPEN_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        assert_eq!(json["openDelayMs"], 700);
        assert_eq!(json["uploadEndpoint"], DEFAULT_UPLOAD_ENDPOINT);
        assert_eq!(json["generateEndpoint"], DEFAULT_GENERATE_ENDPOINT);
    }

    #[test]
    fn missing_delay_falls_back_to_default() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"uploadEndpoint":"http://u","generateEndpoint":"http://g"}"#,
        )
        .unwrap();
        assert_eq!(config.open_delay(), Duration::from_millis(700));
    }
}
