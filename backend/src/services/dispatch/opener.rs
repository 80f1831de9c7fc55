use common::model::link::GeneratedLink;
use common::services::LinkOpener;
use log::warn;
use std::sync::Arc;

/// The opener handed to dispatch jobs, shared across workers as `web::Data`.
#[derive(Clone)]
pub struct DispatchOpener(pub Arc<dyn LinkOpener + Send + Sync>);

impl DispatchOpener {
    pub fn system_browser() -> Self {
        Self(Arc::new(SystemBrowser))
    }
}

/// Opens links in the desktop's default browser.
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open(&self, link: &GeneratedLink) {
        // Best effort: the run goes on with the next link.
        if let Err(err) = webbrowser::open(link.as_str()) {
            warn!("could not open {}: {}", link, err);
        }
    }
}
