//! Seams between the core and the outside world.
//!
//! The frontend implements the two HTTP services with `gloo-net` and the opener
//! with `window.open`; the backend implements the opener with the desktop
//! browser. Tests plug in in-memory fakes.
//!
//! The async traits carry no `Send` bound: in the browser the futures hold
//! JavaScript values and run on a single-threaded executor.

use crate::model::attachment::Attachment;
use crate::model::link::GeneratedLink;
use crate::requests::{GenerateLinksRequest, GenerateLinksResponse};

/// Multipart upload of the invitation image.
#[allow(async_fn_in_trait)]
pub trait ImageUploader {
    /// Uploads `attachment` and returns its public URL. The error is a
    /// human-readable reason; any failure aborts the workflow.
    async fn upload(&self, attachment: &Attachment) -> Result<String, String>;
}

/// The external link-generation service.
#[allow(async_fn_in_trait)]
pub trait LinkGenerator {
    async fn generate(
        &self,
        request: &GenerateLinksRequest,
    ) -> Result<GenerateLinksResponse, String>;
}

/// Opens one link in a new browsing context.
///
/// Opening is fire-and-forget: a blocked or failed open is not reported back,
/// implementations may only log it.
pub trait LinkOpener {
    fn open(&self, link: &GeneratedLink);
}
