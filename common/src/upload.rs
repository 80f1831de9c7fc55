//! At-most-once upload of the invitation image.
//!
//! The coordinator owns the cached image URL for the session. With the default
//! [`UploadCachePolicy::AnyCached`] a cached URL short-circuits every later
//! upload, even when the user picked a different file afterwards; the cache has
//! to be cleared explicitly to upload again. [`UploadCachePolicy::ByContent`]
//! keys the cache by the file digest instead.
//!
//! Hosts that cannot keep `&mut self` borrowed across an await (a UI component
//! whose state is only reachable from message handlers) use the split form:
//! [`ImageUploadCoordinator::plan`] before the request and
//! [`ImageUploadCoordinator::complete`] with its result.

use crate::error::InviteError;
use crate::model::attachment::Attachment;
use crate::services::ImageUploader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadCachePolicy {
    /// Reuse any cached URL, whatever file is currently selected.
    #[default]
    AnyCached,
    /// Reuse the cached URL only for a file with the same content digest.
    ByContent,
}

/// What has to happen before links can be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPlan {
    /// No upload needed; generation uses this URL (possibly none).
    Ready(Option<String>),
    /// Exactly one upload of `attachment` is required.
    Upload { attachment: Attachment, digest: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedUpload {
    url: String,
    digest: String,
}

#[derive(Debug, Default)]
pub struct ImageUploadCoordinator {
    policy: UploadCachePolicy,
    cached: Option<CachedUpload>,
    in_flight: usize,
}

impl ImageUploadCoordinator {
    pub fn new(policy: UploadCachePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> UploadCachePolicy {
        self.policy
    }

    pub fn cached_url(&self) -> Option<&str> {
        self.cached.as_ref().map(|c| c.url.as_str())
    }

    /// `true` between [`plan`](Self::plan) returning an upload and the matching
    /// [`complete`](Self::complete), whatever the outcome.
    pub fn is_uploading(&self) -> bool {
        self.in_flight > 0
    }

    /// Forgets the cached URL so the next selected file gets uploaded.
    pub fn clear(&mut self) {
        self.cached = None;
    }

    /// Decides whether `file` has to be uploaded and marks the upload in flight.
    pub fn plan(&mut self, file: Option<&Attachment>) -> UploadPlan {
        let Some(attachment) = file else {
            return UploadPlan::Ready(self.cached_url().map(str::to_string));
        };

        let digest = attachment.digest();
        if let Some(cached) = &self.cached {
            let reusable = match self.policy {
                UploadCachePolicy::AnyCached => true,
                UploadCachePolicy::ByContent => cached.digest == digest,
            };
            if reusable {
                log::debug!("reusing uploaded image {}", cached.url);
                return UploadPlan::Ready(Some(cached.url.clone()));
            }
        }

        self.in_flight += 1;
        UploadPlan::Upload {
            attachment: attachment.clone(),
            digest,
        }
    }

    /// Records the result of an upload started by [`plan`](Self::plan).
    ///
    /// The uploading state is cleared on both paths; only a success touches the
    /// cache.
    pub fn complete(
        &mut self,
        digest: String,
        result: Result<String, String>,
    ) -> Result<String, InviteError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(url) => {
                log::info!("image uploaded to {url}");
                self.cached = Some(CachedUpload {
                    url: url.clone(),
                    digest,
                });
                Ok(url)
            }
            Err(reason) => {
                log::warn!("image upload failed: {reason}");
                Err(InviteError::UploadFailed(reason))
            }
        }
    }

    /// Returns the URL to attach to the batch, uploading `file` first if needed.
    pub async fn ensure_uploaded<U: ImageUploader>(
        &mut self,
        uploader: &U,
        file: Option<&Attachment>,
    ) -> Result<Option<String>, InviteError> {
        match self.plan(file) {
            UploadPlan::Ready(url) => Ok(url),
            UploadPlan::Upload { attachment, digest } => {
                let result = uploader.upload(&attachment).await;
                self.complete(digest, result).map(Some)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Upload fake answering from a queue of results, `Ok` by default.
    #[derive(Default)]
    pub(crate) struct FakeUploader {
        pub calls: Cell<usize>,
        pub failures: RefCell<Vec<String>>,
    }

    impl FakeUploader {
        pub fn failing(reason: &str) -> Self {
            let uploader = Self::default();
            uploader.failures.borrow_mut().push(reason.to_string());
            uploader
        }
    }

    impl ImageUploader for FakeUploader {
        async fn upload(&self, attachment: &Attachment) -> Result<String, String> {
            self.calls.set(self.calls.get() + 1);
            if let Some(reason) = self.failures.borrow_mut().pop() {
                return Err(reason);
            }
            Ok(format!(
                "https://cdn.example/{}/{}",
                self.calls.get(),
                attachment.file_name
            ))
        }
    }

    pub(crate) fn image(name: &str, content: &[u8]) -> Attachment {
        Attachment::image(name, "image/png", content.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn without_file_returns_cached_url_untouched() {
        let uploader = FakeUploader::default();
        let mut coordinator = ImageUploadCoordinator::default();

        assert_eq!(coordinator.ensure_uploaded(&uploader, None).await, Ok(None));
        assert_eq!(uploader.calls.get(), 0);
    }

    #[tokio::test]
    async fn uploads_once_then_reuses_cached_url() {
        let uploader = FakeUploader::default();
        let mut coordinator = ImageUploadCoordinator::default();
        let first = image("invite.png", b"v1");

        let url = coordinator
            .ensure_uploaded(&uploader, Some(&first))
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://cdn.example/1/invite.png"));
        assert_eq!(uploader.calls.get(), 1);

        // Same file, a different file, or no file: the cached URL wins.
        let changed = image("other.png", b"v2");
        for file in [Some(&first), Some(&changed), None] {
            let again = coordinator.ensure_uploaded(&uploader, file).await.unwrap();
            assert_eq!(again, url);
        }
        assert_eq!(uploader.calls.get(), 1);
        assert!(!coordinator.is_uploading());
    }

    #[tokio::test]
    async fn content_policy_uploads_changed_file() {
        let uploader = FakeUploader::default();
        let mut coordinator = ImageUploadCoordinator::new(UploadCachePolicy::ByContent);
        let first = image("invite.png", b"v1");
        let renamed = image("renamed.png", b"v1");
        let changed = image("invite.png", b"v2");

        coordinator.ensure_uploaded(&uploader, Some(&first)).await.unwrap();
        coordinator.ensure_uploaded(&uploader, Some(&renamed)).await.unwrap();
        assert_eq!(uploader.calls.get(), 1);

        let url = coordinator
            .ensure_uploaded(&uploader, Some(&changed))
            .await
            .unwrap();
        assert_eq!(uploader.calls.get(), 2);
        assert_eq!(url.as_deref(), coordinator.cached_url());
    }

    #[tokio::test]
    async fn failure_clears_uploading_and_keeps_cache_empty() {
        let uploader = FakeUploader::failing("HTTP 500");
        let mut coordinator = ImageUploadCoordinator::default();
        let file = image("invite.png", b"v1");

        let err = coordinator
            .ensure_uploaded(&uploader, Some(&file))
            .await
            .unwrap_err();
        assert_eq!(err, InviteError::UploadFailed("HTTP 500".to_string()));
        assert!(!coordinator.is_uploading());
        assert_eq!(coordinator.cached_url(), None);

        // No automatic retry happened; the next explicit attempt uploads again.
        assert_eq!(uploader.calls.get(), 1);
        coordinator.ensure_uploaded(&uploader, Some(&file)).await.unwrap();
        assert_eq!(uploader.calls.get(), 2);
    }

    #[test]
    fn plan_marks_upload_in_flight_until_complete() {
        let mut coordinator = ImageUploadCoordinator::default();
        let file = image("invite.png", b"v1");

        let UploadPlan::Upload { digest, .. } = coordinator.plan(Some(&file)) else {
            panic!("expected an upload");
        };
        assert!(coordinator.is_uploading());

        coordinator
            .complete(digest, Ok("https://cdn.example/x".into()))
            .unwrap();
        assert!(!coordinator.is_uploading());
        assert_eq!(
            coordinator.plan(Some(&file)),
            UploadPlan::Ready(Some("https://cdn.example/x".into()))
        );
    }

    #[test]
    fn clear_forgets_cached_url() {
        let mut coordinator = ImageUploadCoordinator::default();
        let file = image("invite.png", b"v1");
        let UploadPlan::Upload { digest, .. } = coordinator.plan(Some(&file)) else {
            panic!("expected an upload");
        };
        coordinator.complete(digest, Ok("u".into())).unwrap();

        coordinator.clear();
        assert!(matches!(coordinator.plan(Some(&file)), UploadPlan::Upload { .. }));
    }
}
