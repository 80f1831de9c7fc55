//! The invite workflow as one explicit session object.
//!
//! [`InviteSession`] owns everything the invite form works with: the raw
//! recipients text, the message template, the selected image, the upload cache,
//! the current [`DispatchBatch`] and the dispatcher. UI code only forwards user
//! actions to it, which keeps the workflow testable without a browser.
//!
//! Generation is split in three steps so that a UI component never holds a
//! borrow of its state across an await:
//!
//! 1. [`InviteSession::begin_generation`] validates the input synchronously and
//!    hands out a [`GenerationTicket`]. Nothing goes to the network when the
//!    recipient list is empty.
//! 2. [`run_generation`] performs the upload (if one is needed) and the
//!    generation call using only the ticket.
//! 3. [`InviteSession::finish_generation`] applies the [`GenerationOutcome`].
//!
//! Every ticket carries an epoch. Only the outcome of the most recent ticket may
//! replace the batch; older responses that arrive late are dropped.

use crate::dispatch::{DispatchState, SequentialDispatcher};
use crate::error::InviteError;
use crate::generate::generate_links;
use crate::model::attachment::Attachment;
use crate::model::link::{DispatchBatch, ExportArtifact};
use crate::model::recipient::{RecipientIdentifier, require_recipients};
use crate::model::template::MessageTemplate;
use crate::services::{ImageUploader, LinkGenerator, LinkOpener};
use crate::upload::{ImageUploadCoordinator, UploadCachePolicy, UploadPlan};
use std::time::Duration;

/// Validated input of one generation attempt.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    epoch: u64,
    recipients: Vec<RecipientIdentifier>,
    message: MessageTemplate,
    upload: UploadPlan,
}

impl GenerationTicket {
    pub fn recipients(&self) -> &[RecipientIdentifier] {
        &self.recipients
    }

    pub fn needs_upload(&self) -> bool {
        matches!(self.upload, UploadPlan::Upload { .. })
    }
}

#[derive(Debug, Clone)]
struct UploadRecord {
    digest: String,
    result: Result<String, String>,
}

/// Result of [`run_generation`], to be handed back to the session.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    epoch: u64,
    upload: Option<UploadRecord>,
    result: Result<DispatchBatch, InviteError>,
}

impl GenerationOutcome {
    pub fn result(&self) -> &Result<DispatchBatch, InviteError> {
        &self.result
    }
}

/// Uploads the image if the ticket asks for it, then requests the links.
///
/// An upload failure ends the attempt before the generation service is called.
pub async fn run_generation<U: ImageUploader, G: LinkGenerator>(
    ticket: GenerationTicket,
    uploader: &U,
    generator: &G,
) -> GenerationOutcome {
    let GenerationTicket {
        epoch,
        recipients,
        message,
        upload,
    } = ticket;

    let (image_url, upload) = match upload {
        UploadPlan::Ready(url) => (url, None),
        UploadPlan::Upload { attachment, digest } => {
            let result = uploader.upload(&attachment).await;
            match &result {
                Ok(url) => (Some(url.clone()), Some(UploadRecord { digest, result })),
                Err(reason) => {
                    return GenerationOutcome {
                        epoch,
                        result: Err(InviteError::UploadFailed(reason.clone())),
                        upload: Some(UploadRecord { digest, result }),
                    };
                }
            }
        }
    };

    let result = generate_links(generator, &recipients, &message, image_url.as_deref()).await;
    GenerationOutcome {
        epoch,
        upload,
        result,
    }
}

#[derive(Debug)]
pub struct InviteSession {
    recipients_text: String,
    message: MessageTemplate,
    attachment: Option<Attachment>,
    uploads: ImageUploadCoordinator,
    batch: Option<DispatchBatch>,
    dispatcher: SequentialDispatcher,
    epoch: u64,
    pending: Option<u64>,
}

impl Default for InviteSession {
    fn default() -> Self {
        Self::new(SequentialDispatcher::default().delay(), UploadCachePolicy::default())
    }
}

impl InviteSession {
    pub fn new(open_delay: Duration, policy: UploadCachePolicy) -> Self {
        Self {
            recipients_text: String::new(),
            message: MessageTemplate::default(),
            attachment: None,
            uploads: ImageUploadCoordinator::new(policy),
            batch: None,
            dispatcher: SequentialDispatcher::new(open_delay),
            epoch: 0,
            pending: None,
        }
    }

    pub fn recipients_text(&self) -> &str {
        &self.recipients_text
    }

    pub fn set_recipients_text(&mut self, text: impl Into<String>) {
        self.recipients_text = text.into();
    }

    pub fn message(&self) -> &MessageTemplate {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<MessageTemplate>) {
        self.message = message.into();
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn select_attachment(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    /// Drops the selected image together with its cached upload URL.
    pub fn clear_attachment(&mut self) {
        self.attachment = None;
        self.uploads.clear();
    }

    pub fn uploads(&self) -> &ImageUploadCoordinator {
        &self.uploads
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_uploading()
    }

    /// `true` while the latest ticket has not been finished.
    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn batch(&self) -> Option<&DispatchBatch> {
        self.batch.as_ref()
    }

    pub fn set_open_delay(&mut self, delay: Duration) {
        self.dispatcher.set_delay(delay);
    }

    /// Validates the form and reserves a new epoch.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, InviteError> {
        let recipients = require_recipients(&self.recipients_text)?;

        self.epoch += 1;
        self.pending = Some(self.epoch);
        let upload = self.uploads.plan(self.attachment.as_ref());
        log::debug!(
            "generation {} for {} recipients (upload: {})",
            self.epoch,
            recipients.len(),
            matches!(upload, UploadPlan::Upload { .. })
        );

        Ok(GenerationTicket {
            epoch: self.epoch,
            recipients,
            message: self.message.clone(),
            upload,
        })
    }

    /// Applies an outcome.
    ///
    /// Returns `Ok(true)` when the batch was replaced and `Ok(false)` when the
    /// outcome belonged to a superseded ticket. On error the previous batch is
    /// left as it was.
    pub fn finish_generation(&mut self, outcome: GenerationOutcome) -> Result<bool, InviteError> {
        if let Some(UploadRecord { digest, result }) = outcome.upload {
            // Failures are already part of `outcome.result`.
            let _ = self.uploads.complete(digest, result);
        }

        if outcome.epoch != self.epoch {
            log::info!(
                "discarding response of generation {} (current is {})",
                outcome.epoch,
                self.epoch
            );
            return Ok(false);
        }
        self.pending = None;

        let batch = outcome.result?;
        self.dispatcher.cancel();
        self.batch = Some(batch);
        Ok(true)
    }

    /// Runs the whole generation workflow in one go.
    pub async fn generate<U: ImageUploader, G: LinkGenerator>(
        &mut self,
        uploader: &U,
        generator: &G,
    ) -> Result<bool, InviteError> {
        let ticket = self.begin_generation()?;
        let outcome = run_generation(ticket, uploader, generator).await;
        self.finish_generation(outcome)
    }

    /// Clears the form and the batch. The uploaded image stays cached.
    pub fn reset(&mut self) {
        self.recipients_text.clear();
        self.message = MessageTemplate::new("");
        self.batch = None;
        self.dispatcher.cancel();
        // Responses still in flight must not resurrect the batch.
        self.epoch += 1;
        self.pending = None;
    }

    pub fn clipboard_text(&self) -> Option<String> {
        self.batch.as_ref().map(DispatchBatch::clipboard_text)
    }

    pub fn export_artifact(&self) -> Option<ExportArtifact> {
        self.batch.as_ref().map(DispatchBatch::export_artifact)
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    /// Starts opening the current batch. Without a batch this is a no-op.
    pub fn start_dispatch(&mut self) -> Result<(), InviteError> {
        match &self.batch {
            Some(batch) => self.dispatcher.start(batch),
            None => Ok(()),
        }
    }

    /// Opens the next link; see [`SequentialDispatcher::step`].
    pub fn step_dispatch<O: LinkOpener + ?Sized>(&mut self, opener: &O) -> Option<Duration> {
        let batch = self.batch.as_ref()?;
        self.dispatcher.step(batch, opener)
    }

    pub fn cancel_dispatch(&mut self) {
        self.dispatcher.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::RecordingOpener;
    use crate::error::ValidationError;
    use crate::generate::tests::FakeGenerator;
    use crate::upload::tests::{FakeUploader, image};

    fn session(recipients: &str) -> InviteSession {
        let mut session = InviteSession::default();
        session.set_recipients_text(recipients);
        session
    }

    #[tokio::test]
    async fn full_pipeline_with_image() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("+91 98765, 9876-5432\n123");
        session.select_attachment(image("invite.png", b"img"));

        assert_eq!(session.generate(&uploader, &generator).await, Ok(true));

        assert_eq!(uploader.calls.get(), 1);
        assert_eq!(generator.calls.get(), 1);
        let request = generator.last_request.borrow().clone().unwrap();
        assert_eq!(request.recipients, vec!["9198765", "98765432", "123"]);
        assert_eq!(
            request.image_url.as_deref(),
            Some("https://cdn.example/1/invite.png")
        );
        assert_eq!(session.batch().map(DispatchBatch::len), Some(3));
        assert!(!session.is_uploading());
        assert!(!session.is_generating());
    }

    #[tokio::test]
    async fn second_generation_reuses_upload() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("1,2");
        session.select_attachment(image("invite.png", b"img"));

        session.generate(&uploader, &generator).await.unwrap();
        session.generate(&uploader, &generator).await.unwrap();

        assert_eq!(uploader.calls.get(), 1);
        assert_eq!(generator.calls.get(), 2);
    }

    #[tokio::test]
    async fn empty_recipients_block_every_network_call() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session(" ,\n - ");
        session.select_attachment(image("invite.png", b"img"));

        let err = session.generate(&uploader, &generator).await.unwrap_err();
        assert_eq!(err, InviteError::Validation(ValidationError::NoRecipients));
        assert_eq!(uploader.calls.get(), 0);
        assert_eq!(generator.calls.get(), 0);
        assert!(!session.is_uploading());
    }

    #[tokio::test]
    async fn upload_failure_skips_generation_and_keeps_batch() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("1,2");
        session.generate(&uploader, &generator).await.unwrap();
        let previous = session.batch().cloned();

        session.select_attachment(image("invite.png", b"img"));
        uploader.failures.borrow_mut().push("HTTP 413".into());
        let err = session.generate(&uploader, &generator).await.unwrap_err();

        assert_eq!(err, InviteError::UploadFailed("HTTP 413".into()));
        assert_eq!(generator.calls.get(), 1);
        assert!(!session.is_uploading());
        assert_eq!(session.batch().cloned(), previous);
    }

    #[tokio::test]
    async fn generation_failure_leaves_previous_links() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("1,2");
        session.generate(&uploader, &generator).await.unwrap();

        *generator.fail_with.borrow_mut() = Some("timeout".into());
        session.set_recipients_text("3");
        let err = session.generate(&uploader, &generator).await.unwrap_err();

        assert_eq!(err, InviteError::GenerationFailed("timeout".into()));
        assert_eq!(
            session.clipboard_text().as_deref(),
            Some("https://wa.me/1\nhttps://wa.me/2")
        );
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("111");

        let first = session.begin_generation().unwrap();
        session.set_recipients_text("222");
        let second = session.begin_generation().unwrap();

        let second_outcome = run_generation(second, &uploader, &generator).await;
        let first_outcome = run_generation(first, &uploader, &generator).await;

        assert_eq!(session.finish_generation(second_outcome), Ok(true));
        assert_eq!(session.finish_generation(first_outcome), Ok(false));
        assert_eq!(session.clipboard_text().as_deref(), Some("https://wa.me/222"));
    }

    #[tokio::test]
    async fn reset_clears_form_but_keeps_uploaded_image() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("1");
        session.select_attachment(image("invite.png", b"img"));
        session.generate(&uploader, &generator).await.unwrap();

        session.reset();
        assert_eq!(session.recipients_text(), "");
        assert!(session.message().is_empty());
        assert!(session.batch().is_none());
        assert!(session.uploads().cached_url().is_some());

        session.set_recipients_text("2");
        session.generate(&uploader, &generator).await.unwrap();
        assert_eq!(uploader.calls.get(), 1);
    }

    #[tokio::test]
    async fn reset_discards_in_flight_generation() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("1");

        let ticket = session.begin_generation().unwrap();
        session.reset();
        let outcome = run_generation(ticket, &uploader, &generator).await;

        assert_eq!(session.finish_generation(outcome), Ok(false));
        assert!(session.batch().is_none());
    }

    #[tokio::test]
    async fn clear_attachment_forces_new_upload() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let mut session = session("1");
        session.select_attachment(image("a.png", b"a"));
        session.generate(&uploader, &generator).await.unwrap();

        session.clear_attachment();
        assert!(session.attachment().is_none());
        session.select_attachment(image("b.png", b"b"));
        session.generate(&uploader, &generator).await.unwrap();

        assert_eq!(uploader.calls.get(), 2);
    }

    #[tokio::test]
    async fn new_batch_cancels_running_dispatch() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let opener = RecordingOpener::default();
        let mut session = session("1,2,3");
        session.generate(&uploader, &generator).await.unwrap();

        session.start_dispatch().unwrap();
        session.step_dispatch(&opener);
        assert_eq!(session.start_dispatch(), Err(InviteError::DispatchInProgress));

        session.set_recipients_text("4");
        session.generate(&uploader, &generator).await.unwrap();
        assert_eq!(session.dispatch_state(), DispatchState::Idle);
        assert_eq!(session.step_dispatch(&opener), None);
        assert_eq!(opener.opened.borrow().len(), 1);
    }

    #[tokio::test]
    async fn dispatches_current_batch_with_configured_delay() {
        let uploader = FakeUploader::default();
        let generator = FakeGenerator::default();
        let opener = RecordingOpener::default();
        let mut session = session("1,2,3");
        session.set_open_delay(Duration::from_millis(50));
        session.generate(&uploader, &generator).await.unwrap();

        session.start_dispatch().unwrap();
        while let Some(wait) = session.step_dispatch(&opener) {
            assert_eq!(wait, Duration::from_millis(50));
            opener.now.set(opener.now.get() + wait);
        }

        let opened = opener.opened.borrow();
        assert_eq!(opened.len(), 3);
        assert_eq!(opened[2].0, Duration::from_millis(100));
    }

    #[test]
    fn dispatch_without_batch_is_a_no_op() {
        let opener = RecordingOpener::default();
        let mut session = InviteSession::default();
        assert_eq!(session.start_dispatch(), Ok(()));
        assert_eq!(session.step_dispatch(&opener), None);
        assert!(session.clipboard_text().is_none());
        assert!(session.export_artifact().is_none());
    }
}
