//! Document export contract

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::entitlement::Capability;

/// Output formats a letter can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// Capability a caller needs to export in this format
    pub fn capability(&self) -> Capability {
        match self {
            ExportFormat::Txt => Capability::ExportTxt,
            ExportFormat::Docx => Capability::ExportDocx,
            ExportFormat::Pdf => Capability::ExportPdf,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ExportError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("Unknown export format: {format}")]
    UnknownFormat { format: String },

    #[error("No encoder available for {format}")]
    Unsupported { format: ExportFormat },

    #[error("Failed to encode document: {message}")]
    Encoding { message: String },
}

/// Turns letter text into a document of one format
pub trait ExportEncoder: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn encode(&self, letter: &str) -> Result<Vec<u8>, ExportError>;
}
