//! Error types shared by the resolver, the encoding pipeline and the dispatchers.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Error raised while turning a request into a QR code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QrError {
    /// Malformed or missing input. Always raised before any encoder runs.
    #[error("{0}")]
    Validation(String),
    /// Every encoder in the chain failed; carries the last cause.
    #[error("QR code generation failed: {0}")]
    Encoding(String),
    /// Reading the scratch image or writing CLI output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QrError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for the "missing required parameter" validation failure.
    pub fn missing(param: &str) -> Self {
        Self::Validation(format!("Missing required parameter: {}", param))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<QrError> for McpError {
    fn from(err: QrError) -> Self {
        match err {
            QrError::Validation(message) => McpError::invalid_params(message, None),
            other => McpError::internal_error(other.to_string(), None),
        }
    }
}

pub type Result<T> = std::result::Result<T, QrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_names_the_parameter() {
        let err = QrError::missing("ssid");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Missing required parameter: ssid");
    }

    #[test]
    fn test_encoding_error_carries_cause() {
        let err = QrError::Encoding("data too long".into());
        assert!(!err.is_validation());
        assert!(err.to_string().contains("data too long"));
    }

    #[test]
    fn test_validation_maps_to_invalid_params() {
        let mcp: McpError = QrError::validation("bad size").into();
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(mcp.message, "bad size");
    }

    #[test]
    fn test_encoding_maps_to_internal_error() {
        let mcp: McpError = QrError::Encoding("boom".into()).into();
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }
}
