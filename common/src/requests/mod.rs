//! Wire formats exchanged with the external services and the local backend.

use serde::{Deserialize, Serialize};

/// Body of the link-generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLinksRequest {
    pub recipients: Vec<String>,
    pub message: String,
    pub image_url: Option<String>,
}

/// Answer of the link-generation service. `links` is expected to be as long as
/// the request's `recipients` and in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateLinksResponse {
    pub links: Vec<String>,
}

/// Answer of the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub image_url: String,
}

/// Request payload for the host-side dispatch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDispatchRequest {
    pub links: Vec<String>,
    /// Overrides the configured delay between opens, in milliseconds.
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDispatchResponse {
    pub job_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_matches_service_contract() {
        let request = GenerateLinksRequest {
            recipients: vec!["919876".into()],
            message: "Hi {{name}}".into(),
            image_url: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "recipients": ["919876"],
                "message": "Hi {{name}}",
                "imageUrl": null
            })
        );
    }

    #[test]
    fn upload_response_reads_image_url() {
        let response: UploadImageResponse =
            serde_json::from_str(r#"{"imageUrl":"https://cdn.example/i.png"}"#).unwrap();
        assert_eq!(response.image_url, "https://cdn.example/i.png");
    }
}
