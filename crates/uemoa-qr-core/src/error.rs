//! # Error Types
//!
//! Codec error types for uemoa-qr-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  uemoa-qr-core errors (this file)                                      │
//! │  ├── QrError          - Codec / integrity failures                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  uemoa-qr-service errors (separate crate)                              │
//! │  └── ServiceError     - Config and collaborator failures               │
//! │                                                                         │
//! │  Flow: ValidationError → QrError → ServiceError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Categories
//! | Category      | Variants                                  | Surfaced?     |
//! |---------------|-------------------------------------------|---------------|
//! | Validation    | `Validation`, `InvalidTag`, `FieldTooLong` | always        |
//! | Format        | `EmptyInput`                              | always        |
//! | Integrity     | `CrcMismatch`                             | always        |
//! | Configuration | `Unsupported`                             | always        |
//!
//! Malformed TLV in the middle of a stream is NOT an error: decoding stops at
//! the first field it cannot read (see [`crate::tlv::decode_all`]).

use thiserror::Error;

// =============================================================================
// QR Error
// =============================================================================

/// Errors raised by the codec.
///
/// Every failure is synchronous and leaves nothing behind: the codec keeps
/// no state between calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// A TLV tag was not exactly two characters.
    #[error("Invalid tag '{tag}': tags are exactly 2 characters")]
    InvalidTag { tag: String },

    /// A TLV value does not fit the two-digit length field.
    #[error("Value of tag {tag} is {len} characters, maximum is {max}")]
    FieldTooLong { tag: String, len: usize, max: usize },

    /// Nothing to compute or parse.
    #[error("Input is empty")]
    EmptyInput,

    /// The trailing CRC does not match the payload.
    ///
    /// ## When This Occurs
    /// - The code was damaged or hand-edited after generation
    /// - A scanner truncated the payload
    ///
    /// Never retried: the codec is a pure function.
    #[error("CRC mismatch: payload carries {actual}, computed {expected}")]
    CrcMismatch { expected: String, actual: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The requested operation is switched off or has no collaborator.
    #[error("Operation not supported: {0}")]
    Unsupported(String),
}

/// The four error families of the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing/invalid input, raised before serialization.
    Validation,
    /// Unreadable TLV input.
    Format,
    /// Checksum failure.
    Integrity,
    /// Operation unavailable in this deployment.
    Configuration,
}

impl QrError {
    /// Returns the family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            QrError::Validation(_) | QrError::InvalidTag { .. } | QrError::FieldTooLong { .. } => {
                ErrorCategory::Validation
            }
            QrError::EmptyInput => ErrorCategory::Format,
            QrError::CrcMismatch { .. } => ErrorCategory::Integrity,
            QrError::Unsupported(_) => ErrorCategory::Configuration,
        }
    }

    /// Codec errors are deterministic, so retrying never helps.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Shorthand for a missing required field.
    pub(crate) fn required(field: &str) -> Self {
        QrError::Validation(ValidationError::Required {
            field: field.to_string(),
        })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a payment intent doesn't meet the scheme rules.
/// Used for early validation before any field is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., reference with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with QrError.
pub type QrResult<T> = Result<T, QrError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QrError::FieldTooLong {
            tag: "59".to_string(),
            len: 120,
            max: 99,
        };
        assert_eq!(
            err.to_string(),
            "Value of tag 59 is 120 characters, maximum is 99"
        );

        let err = QrError::CrcMismatch {
            expected: "1A2B".to_string(),
            actual: "FFFF".to_string(),
        };
        assert_eq!(err.to_string(), "CRC mismatch: payload carries FFFF, computed 1A2B");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "alias".to_string(),
        };
        assert_eq!(err.to_string(), "alias is required");

        let err = ValidationError::TooLong {
            field: "city".to_string(),
            max: 15,
        };
        assert_eq!(err.to_string(), "city must be at most 15 characters");
    }

    #[test]
    fn test_validation_converts_to_qr_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        let qr_err: QrError = validation_err.into();
        assert!(matches!(qr_err, QrError::Validation(_)));
        assert_eq!(qr_err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            QrError::InvalidTag { tag: "1".into() }.category(),
            ErrorCategory::Validation
        );
        assert_eq!(QrError::EmptyInput.category(), ErrorCategory::Format);
        assert_eq!(
            QrError::CrcMismatch {
                expected: "0000".into(),
                actual: "1111".into()
            }
            .category(),
            ErrorCategory::Integrity
        );
        assert_eq!(
            QrError::Unsupported("images".into()).category(),
            ErrorCategory::Configuration
        );
        assert!(!QrError::EmptyInput.is_retryable());
    }
}
