//! Document encoders and the registry that selects them by format

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::export::{ExportEncoder, ExportError, ExportFormat};

/// UTF-8 plain-text export with normalized line endings
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextEncoder;

impl ExportEncoder for PlainTextEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Txt
    }

    fn encode(&self, letter: &str) -> Result<Vec<u8>, ExportError> {
        let mut text = letter.replace("\r\n", "\n");
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text.into_bytes())
    }
}

/// Encoders keyed by the format they produce
#[derive(Clone, Default)]
pub struct ExportRegistry {
    encoders: HashMap<ExportFormat, Arc<dyn ExportEncoder>>,
}

impl ExportRegistry {
    /// Registry with the built-in encoders
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(PlainTextEncoder));
        registry
    }

    /// Add an encoder, replacing any previous one for the same format
    pub fn register(&mut self, encoder: Arc<dyn ExportEncoder>) {
        self.encoders.insert(encoder.format(), encoder);
    }

    pub fn supports(&self, format: ExportFormat) -> bool {
        self.encoders.contains_key(&format)
    }

    pub fn encode(&self, format: ExportFormat, letter: &str) -> Result<Vec<u8>, ExportError> {
        let encoder = self
            .encoders
            .get(&format)
            .ok_or(ExportError::Unsupported { format })?;
        encoder.encode(letter)
    }
}

impl std::fmt::Debug for ExportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.encoders.keys().map(ExportFormat::extension).collect();
        formats.sort_unstable();
        f.debug_struct("ExportRegistry")
            .field("formats", &formats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl ExportEncoder for Upper {
        fn format(&self) -> ExportFormat {
            ExportFormat::Pdf
        }

        fn encode(&self, letter: &str) -> Result<Vec<u8>, ExportError> {
            Ok(letter.to_uppercase().into_bytes())
        }
    }

    #[test]
    fn test_plain_text_normalizes_newlines() {
        let bytes = PlainTextEncoder.encode("Dear owner,\r\nThanks").unwrap();
        assert_eq!(bytes, b"Dear owner,\nThanks\n");
    }

    #[test]
    fn test_defaults_only_cover_text() {
        let registry = ExportRegistry::with_defaults();
        assert!(registry.supports(ExportFormat::Txt));
        assert_eq!(
            registry.encode(ExportFormat::Pdf, "x"),
            Err(ExportError::Unsupported {
                format: ExportFormat::Pdf
            })
        );
    }

    #[test]
    fn test_register_adds_format() {
        let mut registry = ExportRegistry::with_defaults();
        registry.register(Arc::new(Upper));
        assert_eq!(registry.encode(ExportFormat::Pdf, "hi").unwrap(), b"HI");
    }
}
