//! Client side of the link-generation service.

use crate::error::{InviteError, ValidationError};
use crate::model::link::DispatchBatch;
use crate::model::recipient::RecipientIdentifier;
use crate::model::template::MessageTemplate;
use crate::requests::GenerateLinksRequest;
use crate::services::LinkGenerator;

/// Builds the service payload. The template is shipped unrendered.
pub fn build_request(
    recipients: &[RecipientIdentifier],
    message: &MessageTemplate,
    image_url: Option<&str>,
) -> GenerateLinksRequest {
    GenerateLinksRequest {
        recipients: recipients.iter().map(|r| r.as_str().to_string()).collect(),
        message: message.as_str().to_string(),
        image_url: image_url.map(str::to_string),
    }
}

/// Requests one deep link per recipient.
///
/// Either the whole batch comes back or an error does. When the service returns
/// a different number of links than recipients were sent, the links are passed
/// through as returned: the mismatch is only logged.
pub async fn generate_links<G: LinkGenerator>(
    generator: &G,
    recipients: &[RecipientIdentifier],
    message: &MessageTemplate,
    image_url: Option<&str>,
) -> Result<DispatchBatch, InviteError> {
    if recipients.is_empty() {
        return Err(ValidationError::NoRecipients.into());
    }

    let request = build_request(recipients, message, image_url);
    let response = generator
        .generate(&request)
        .await
        .map_err(InviteError::GenerationFailed)?;

    if response.links.len() != recipients.len() {
        log::warn!(
            "link service returned {} links for {} recipients",
            response.links.len(),
            recipients.len()
        );
    }

    Ok(DispatchBatch::from(response.links))
}
