//! Recipient parsing and normalization.
//!
//! Users paste numbers in whatever shape their address book exports: one per
//! line, comma separated, with spaces, dashes, parentheses or a leading `+`.
//! The normalizer turns that text into digits-only identifiers without judging
//! whether a number is plausible; format correctness is left to the
//! link-generation service.

use crate::error::ValidationError;
use serde::Serialize;
use std::fmt;

/// A canonical recipient: a non-empty string of ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecipientIdentifier(String);

impl RecipientIdentifier {
    /// Normalizes a single token. Returns `None` when nothing but noise remains.
    ///
    /// Every character that is neither a digit nor `+` is removed first, then
    /// any leading `+` signs are stripped. A `+` in the middle of the token is
    /// therefore kept by the first pass and would make the result non-canonical,
    /// so remaining `+` signs are dropped as well.
    pub fn normalize(token: &str) -> Option<Self> {
        let kept: String = token
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        let digits: String = kept
            .trim_start_matches('+')
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        if digits.is_empty() {
            None
        } else {
            Some(Self(digits))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecipientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Splits `text` on commas and newlines and normalizes every token.
///
/// Order is preserved and duplicates are kept. Tabs, spaces, dashes and
/// parentheses are noise inside a token, never separators.
pub fn parse_recipients(text: &str) -> Vec<RecipientIdentifier> {
    text.split([',', '\n'])
        .filter_map(RecipientIdentifier::normalize)
        .collect()
}

/// Same as [`parse_recipients`] but refuses an empty result.
pub fn require_recipients(text: &str) -> Result<Vec<RecipientIdentifier>, ValidationError> {
    let recipients = parse_recipients(text);
    if recipients.is_empty() {
        return Err(ValidationError::NoRecipients);
    }
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(recipients: &[RecipientIdentifier]) -> Vec<&str> {
        recipients.iter().map(RecipientIdentifier::as_str).collect()
    }

    #[test]
    fn normalizes_mixed_input_in_order() {
        let parsed = parse_recipients("+91 98765, 9876-5432\n123");
        assert_eq!(strings(&parsed), vec!["9198765", "98765432", "123"]);
    }

    #[test]
    fn strips_noise_characters_inside_tokens() {
        let parsed = parse_recipients("(555)\t123-4567\r\n +1 (800) 555 0199");
        assert_eq!(strings(&parsed), vec!["5551234567", "18005550199"]);
    }

    #[test]
    fn drops_tokens_that_become_empty() {
        let parsed = parse_recipients(",,\n  \n-(),abc,+,42");
        assert_eq!(strings(&parsed), vec!["42"]);
    }

    #[test]
    fn keeps_duplicates_and_short_numbers() {
        let parsed = parse_recipients("1, 1\n1");
        assert_eq!(strings(&parsed), vec!["1", "1", "1"]);
    }

    #[test]
    fn every_identifier_is_digits_only() {
        let input = "+44 20 7946 0958, ++12+34,\n(0)-9, x+y, 7";
        let parsed = parse_recipients(input);
        let non_empty_tokens = input
            .split([',', '\n'])
            .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
            .count();

        assert_eq!(parsed.len(), non_empty_tokens);
        for id in &parsed {
            assert!(!id.as_str().is_empty());
            assert!(id.as_str().chars().all(|c| c.is_ascii_digit()), "{id}");
        }
    }

    #[test]
    fn empty_input_is_a_validation_error() {
        assert_eq!(require_recipients(" , \n "), Err(ValidationError::NoRecipients));
        assert_eq!(require_recipients("").unwrap_err(), ValidationError::NoRecipients);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecipientIdentifier::normalize("+49 151").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"49151\"");
    }
}
