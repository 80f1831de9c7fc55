//! Browser capabilities used by the invite sender: opening tabs, the
//! clipboard and file downloads.

use common::error::InviteError;
use common::model::link::{ExportArtifact, GeneratedLink};
use common::services::LinkOpener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAnchorElement;

/// Opens links with `window.open(link, "_blank")`.
pub struct WindowOpener;

impl LinkOpener for WindowOpener {
    fn open(&self, link: &GeneratedLink) {
        let Some(window) = web_sys::window() else {
            return;
        };
        // A popup blocker answers with `None`; that is not reported back.
        if let Err(err) = window.open_with_url_and_target(link.as_str(), "_blank") {
            gloo_console::error!(format!("window.open failed for {}: {:?}", link, err));
        }
    }
}

pub async fn copy_to_clipboard(text: &str) -> Result<(), InviteError> {
    let window =
        web_sys::window().ok_or_else(|| InviteError::ClipboardError("no window".to_string()))?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|err| InviteError::ClipboardError(format!("{:?}", err)))
}

/// Triggers a download of `artifact` through a temporary object URL.
pub fn download(artifact: &ExportArtifact) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let blob =
        gloo_file::Blob::new_with_options(artifact.body.as_str(), Some(artifact.mime_type.as_str()));
    // Revoked when dropped at the end of this function.
    let url = gloo_file::ObjectUrl::from(blob);

    match document.create_element("a") {
        Ok(element) => {
            let anchor: HtmlAnchorElement = element.unchecked_into();
            anchor.set_href(&url);
            anchor.set_download(&artifact.file_name);
            anchor.click();
        }
        Err(err) => gloo_console::error!(format!("cannot create download link: {:?}", err)),
    }
}
