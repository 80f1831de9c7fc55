use common::config::ClientConfig;
use common::error::InviteError;
use common::model::attachment::Attachment;
use common::session::GenerationOutcome;

#[derive(Clone)]
pub enum Msg {
    ConfigLoaded(ClientConfig),
    UpdateRecipients(String),
    UpdateMessage(String),
    FileSelected(web_sys::File),
    AttachmentLoaded(Attachment),
    ClearAttachment,
    Generate,
    GenerationFinished(GenerationOutcome),
    Reset,
    CopyAll,
    CopyFinished(Result<(), InviteError>),
    Download,
    OpenSequentially,
    DispatchTick,
    CancelDispatch,
    /// Hands the batch to the backend, which opens the links in the desktop browser.
    OpenOnHost,
}
