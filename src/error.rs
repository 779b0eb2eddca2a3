// Error types module

use serde::Serialize;
use std::fmt;

use crate::composer::ComposeError;
use crate::external::ExternalError;

/// Centralized error type for the gateway
///
/// Categorizes errors for appropriate HTTP status mapping and the JSON
/// failure body every non-2xx response carries.
#[derive(Debug)]
pub enum GatewayError {
    /// Image composition failures (validation, decode, render)
    Compose(ComposeError),

    /// External tool failures (transcode, export, fetch)
    External(ExternalError),

    /// Internal gateway errors (I/O, resource exhaustion)
    Internal(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Compose(err) => write!(f, "{}", err),
            GatewayError::External(err) => write!(f, "{}", err),
            GatewayError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Client-facing failure body carried by every non-2xx response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub detail: String,
}

impl From<ComposeError> for GatewayError {
    fn from(err: ComposeError) -> Self {
        GatewayError::Compose(err)
    }
}

impl From<ExternalError> for GatewayError {
    fn from(err: ExternalError) -> Self {
        GatewayError::External(err)
    }
}

impl GatewayError {
    pub fn to_http_status(&self) -> u16 {
        match self {
            GatewayError::Compose(err) => err.to_http_status(),
            GatewayError::External(err) => err.to_http_status(),
            GatewayError::Internal(_) => 500,
        }
    }

    /// Stable category for the client-facing failure body
    pub fn category(&self) -> &'static str {
        match self {
            GatewayError::Compose(err) => err.category(),
            GatewayError::External(_) => "external",
            GatewayError::Internal(_) => "internal",
        }
    }

    /// Failure body: success flag, stable error category, and a
    /// human-readable detail string. Never carries stack traces.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.category(),
            detail: self.to_string(),
        }
    }

    pub fn to_json_body(&self) -> serde_json::Value {
        serde_json::json!({
            "success": false,
            "error": self.category(),
            "detail": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_error_maps_through() {
        let err: GatewayError = ComposeError::missing_input("watermark").into();
        assert_eq!(err.to_http_status(), 400);
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_json_body_shape() {
        let err: GatewayError = ComposeError::missing_input("subject").into();
        let body = err.to_json_body();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "validation");
        assert_eq!(body["detail"], "Missing required input: subject");

        let serialized = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(serialized, body);
    }

    #[test]
    fn test_external_error_is_bad_gateway() {
        let err: GatewayError = ExternalError::MissingOutput {
            tool: "ffmpeg".to_string(),
        }
        .into();
        assert_eq!(err.to_http_status(), 502);
        assert_eq!(err.category(), "external");
    }

    #[test]
    fn test_internal_error_display() {
        let err = GatewayError::Internal("worker pool exhausted".to_string());
        assert_eq!(err.to_string(), "Internal error: worker pool exhausted");
        assert_eq!(err.to_http_status(), 500);
    }
}
