//! Error taxonomy of the invite pipeline.
//!
//! Every variant is terminal for the operation that produced it and is shown to
//! the user as a notice. Nothing here is retried automatically.

use thiserror::Error;

/// Input problems detected locally, before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Add at least one recipient number.")]
    NoRecipients,
    #[error("Only image files can be attached (got `{0}`).")]
    NotAnImage(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InviteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The upload service answered with a non-success status or the transport failed.
    #[error("Image upload failed: {0}")]
    UploadFailed(String),

    /// The link-generation service failed; no partial batch is kept.
    #[error("Failed to generate links: {0}")]
    GenerationFailed(String),

    #[error("Could not copy the links to the clipboard: {0}")]
    ClipboardError(String),

    #[error("Links are already being opened, wait for the current run to finish.")]
    DispatchInProgress,
}

pub type Result<T, E = InviteError> = std::result::Result<T, E>;
