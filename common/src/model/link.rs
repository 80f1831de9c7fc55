//! Generated deep links and the batch they form.
//!
//! A [`DispatchBatch`] is the result of one successful generation call. The copy
//! and export delivery modes both serialize it with [`DispatchBatch::to_text`],
//! so the clipboard content and the downloaded file are always byte-identical.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Suggested file name of the downloadable link list.
pub const EXPORT_FILE_NAME: &str = "whatsapp-links.txt";
pub const EXPORT_MIME_TYPE: &str = "text/plain";

/// Opaque URI returned by the link-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedLink(String);

impl GeneratedLink {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered links of one generation call. Position `i` belongs to recipient `i`
/// of the request, as far as the service honours its contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispatchBatch {
    links: Vec<GeneratedLink>,
}

impl DispatchBatch {
    pub fn new(links: Vec<GeneratedLink>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &[GeneratedLink] {
        &self.links
    }

    pub fn get(&self, index: usize) -> Option<&GeneratedLink> {
        self.links.get(index)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links joined with `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.links
            .iter()
            .map(GeneratedLink::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text written by the bulk copy action.
    pub fn clipboard_text(&self) -> String {
        self.to_text()
    }

    /// File produced by the bulk export action.
    pub fn export_artifact(&self) -> ExportArtifact {
        ExportArtifact {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime_type: EXPORT_MIME_TYPE.to_string(),
            body: self.to_text(),
        }
    }
}

impl From<Vec<String>> for DispatchBatch {
    fn from(links: Vec<String>) -> Self {
        Self::new(links.into_iter().map(GeneratedLink::new).collect())
    }
}

/// A downloadable text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub body: String,
}
