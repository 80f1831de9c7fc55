//! Optional invitation image attached to a dispatch.

use crate::error::ValidationError;

/// An image picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Builds an attachment, refusing anything that is not `image/*`.
    pub fn image(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage(mime_type));
        }
        Ok(Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        })
    }

    /// MD5 hex digest of the file content, used as the file identity.
    pub fn digest(&self) -> String {
        format!("{:x}", md5::compute(&self.bytes))
    }
}
