//! Message templates with `{{name}}` placeholders.
//!
//! The template travels to the link-generation service unrendered; the service
//! fills in per-recipient values. [`MessageTemplate::render`] is the reference
//! behaviour of that substitution and is used locally for previews.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Template pre-filled in the invite form.
pub const DEFAULT_MESSAGE: &str = "Hi {{name}}, you're invited!\nEvent: {{event}}\nDetails: {{link}}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTemplate(String);

impl MessageTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substitutes every `{{key}}` whose key is bound in `values`.
    ///
    /// Unbound placeholders stay in the output exactly as written, so rendering
    /// never fails.
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.0, |caps: &Captures| match values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Distinct placeholder names, in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER_RE.captures_iter(&self.0) {
            let name = &caps[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self(DEFAULT_MESSAGE.to_string())
    }
}

impl From<String> for MessageTemplate {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for MessageTemplate {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}
