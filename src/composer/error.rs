//! Composition error types
//!
//! Provides structured error handling with HTTP status mapping for the
//! image composition pipeline.

use std::fmt;

/// Errors that can occur while composing a product sheet
#[derive(Debug, Clone)]
pub enum ComposeError {
    // === Validation Errors ===
    /// A required input buffer is missing or empty
    MissingInput { field: &'static str },

    // === Decoding Errors ===
    /// An input buffer is not a decodable image
    DecodeFailed {
        field: &'static str,
        message: String,
    },

    // === Processing Errors ===
    /// A resize, rotation, or composite transform failed
    RenderFailed { message: String },
    /// Encoding to the output format failed
    EncodeFailed { format: String, message: String },
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::MissingInput { field } => {
                write!(f, "Missing required input: {}", field)
            }
            ComposeError::DecodeFailed { field, message } => {
                write!(f, "Failed to decode {} image: {}", field, message)
            }
            ComposeError::RenderFailed { message } => {
                write!(f, "Render failed: {}", message)
            }
            ComposeError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
        }
    }
}

impl std::error::Error for ComposeError {}

impl ComposeError {
    /// Maps composition errors to HTTP status codes
    ///
    /// Status mapping:
    /// - MissingInput, DecodeFailed → 400 (Bad Request)
    /// - RenderFailed, EncodeFailed → 500 (Internal Server Error)
    pub fn to_http_status(&self) -> u16 {
        match self {
            ComposeError::MissingInput { .. } | ComposeError::DecodeFailed { .. } => 400,
            ComposeError::RenderFailed { .. } | ComposeError::EncodeFailed { .. } => 500,
        }
    }

    /// Stable error category for client-facing JSON bodies
    pub fn category(&self) -> &'static str {
        match self {
            ComposeError::MissingInput { .. } => "validation",
            ComposeError::DecodeFailed { .. } => "decode",
            ComposeError::RenderFailed { .. } | ComposeError::EncodeFailed { .. } => "render",
        }
    }

    /// Helper constructors for common error patterns
    pub fn missing_input(field: &'static str) -> Self {
        ComposeError::MissingInput { field }
    }

    pub fn decode_failed(field: &'static str, message: impl Into<String>) -> Self {
        ComposeError::DecodeFailed {
            field,
            message: message.into(),
        }
    }

    pub fn render_failed(message: impl Into<String>) -> Self {
        ComposeError::RenderFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ComposeError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }
}
