//! HTTP side of the invite sender.
//!
//! `HttpServices` implements the two service seams of the core with
//! `gloo-net`, pointed at the endpoints of the loaded `ClientConfig`. The free
//! functions talk to the local backend.

use common::config::ClientConfig;
use common::model::attachment::Attachment;
use common::requests::{
    GenerateLinksRequest, GenerateLinksResponse, StartDispatchRequest, StartDispatchResponse,
    UploadImageResponse,
};
use common::services::{ImageUploader, LinkGenerator};
use gloo_net::http::{Request, Response};
use web_sys::FormData;

/// Multipart field the upload service reads the image from.
const UPLOAD_FIELD: &str = "image";

pub struct HttpServices {
    config: ClientConfig,
}

impl HttpServices {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl ImageUploader for HttpServices {
    async fn upload(&self, attachment: &Attachment) -> Result<String, String> {
        let form = FormData::new().map_err(|err| format!("{:?}", err))?;
        let blob = gloo_file::Blob::new_with_options(
            attachment.bytes.as_slice(),
            Some(attachment.mime_type.as_str()),
        );
        form.append_with_blob_and_filename(UPLOAD_FIELD, blob.as_ref(), &attachment.file_name)
            .map_err(|err| format!("{:?}", err))?;

        let response = Request::post(&self.config.upload_endpoint)
            .body(form)
            .map_err(|err| err.to_string())?
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let response = ensure_success(response).await?;

        let body: UploadImageResponse = response.json().await.map_err(|err| err.to_string())?;
        Ok(body.image_url)
    }
}

impl LinkGenerator for HttpServices {
    async fn generate(
        &self,
        request: &GenerateLinksRequest,
    ) -> Result<GenerateLinksResponse, String> {
        let response = Request::post(&self.config.generate_endpoint)
            .json(request)
            .map_err(|err| err.to_string())?
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let response = ensure_success(response).await?;

        response.json().await.map_err(|err| err.to_string())
    }
}

/// Loads the endpoints and the open delay from the backend.
pub async fn fetch_client_config() -> Result<ClientConfig, String> {
    let response = Request::get("/api/config")
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let response = ensure_success(response).await?;
    response.json().await.map_err(|err| err.to_string())
}

/// Asks the backend to open `links` in the desktop browser. Returns the job ID.
pub async fn start_host_dispatch(links: Vec<String>, delay_ms: u64) -> Result<String, String> {
    let payload = StartDispatchRequest {
        links,
        delay_ms: Some(delay_ms),
    };
    let response = Request::post("/api/dispatch/start")
        .json(&payload)
        .map_err(|err| err.to_string())?
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let response = ensure_success(response).await?;

    let body: StartDispatchResponse = response.json().await.map_err(|err| err.to_string())?;
    Ok(body.job_id)
}

async fn ensure_success(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if body.is_empty() {
        Err(format!("HTTP {}", status))
    } else {
        Err(format!("HTTP {}: {}", status, body))
    }
}
