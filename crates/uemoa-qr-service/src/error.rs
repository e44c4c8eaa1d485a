//! # Service Error Types
//!
//! Error types for the QR service layer.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Service Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Codec       │  │  Configuration  │  │      Rendering          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Qr(QrError)    │  │  InvalidConfig  │  │  RenderingUnsupported   │ │
//! │  │                 │  │  ConfigLoad...  │  │  RenderFailed           │ │
//! │  │                 │  │  ConfigSave...  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use uemoa_qr_core::{ErrorCategory, QrError, ValidationError};

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error type covering codec, configuration, and rendering failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    // =========================================================================
    // Codec Errors
    // =========================================================================
    /// The codec refused the input.
    #[error(transparent)]
    Qr(#[from] QrError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid QR configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Rendering Errors
    // =========================================================================
    /// Image output is switched off or no renderer is attached.
    #[error("QR image rendering unsupported: {0}")]
    RenderingUnsupported(String),

    /// The renderer failed.
    #[error("QR image rendering failed: {0}")]
    RenderFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Qr(QrError::Validation(err))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ServiceError {
    fn from(err: toml::ser::Error) -> Self {
        ServiceError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ServiceError {
    /// Maps the error onto the codec's four families.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::Qr(err) => err.category(),
            _ => ErrorCategory::Configuration,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidConfig(_)
                | ServiceError::ConfigLoadFailed(_)
                | ServiceError::ConfigSaveFailed(_)
                | ServiceError::RenderingUnsupported(_)
        )
    }

    /// Returns true if the caller's input was rejected.
    pub fn is_validation_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Only a failing renderer may succeed on a second try.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::RenderFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = ServiceError::from(QrError::CrcMismatch {
            expected: "ABCD".into(),
            actual: "0000".into(),
        });
        assert_eq!(err.category(), ErrorCategory::Integrity);
        assert!(!err.is_config_error());
        assert!(!err.is_retryable());

        let err = ServiceError::RenderingUnsupported("disabled".into());
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validation_conversion() {
        let err: ServiceError = ValidationError::Required {
            field: "alias".into(),
        }
        .into();
        assert!(err.is_validation_error());
        assert_eq!(err.to_string(), "Validation error: alias is required");
    }

    #[test]
    fn test_retryable() {
        assert!(ServiceError::RenderFailed("encoder".into()).is_retryable());
        assert!(!ServiceError::InvalidConfig("x".into()).is_retryable());
    }
}
