//! Descriptors for the export formats and subtitle variants the service offers.

use serde::{Deserialize, Serialize};

/// A project or subtitle export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormat {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// File extension without the leading dot
    #[serde(default)]
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleVariant {
    pub id: String,
    #[serde(default)]
    pub description: String,
}
