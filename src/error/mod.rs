//! Error handling module.
//!
//! This module provides the errors callers of the generator can observe and
//! maps each one to a stable numeric code.

pub mod codes;

pub use codes::{ErrorCategory, ErrorCode};

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration that cannot be normalized.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Missing or blank seller id for a business identifier.
    #[error("Invalid seller reference: {0}")]
    InvalidSellerReference(String),

    /// Day counter cannot advance any further.
    #[error("Sequence exhausted for: {0}")]
    SequenceExhausted(String),

    /// Sequence store error.
    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl AppError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfiguration(_) => ErrorCode::INVALID_CONFIGURATION,
            Self::InvalidSellerReference(_) => ErrorCode::INVALID_SELLER_REFERENCE,
            Self::SequenceExhausted(_) => ErrorCode::SEQUENCE_EXHAUSTED,
            Self::Storage(_) => ErrorCode::STORAGE_ERROR,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Exhausted(key) => Self::SequenceExhausted(key),
            other => Self::Storage(other),
        }
    }
}

/// Storage-specific error type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Lock acquisition failed.
    #[error("Failed to acquire lock: {0}")]
    LockFailed(String),

    /// File I/O error.
    #[error("File I/O error: {0}")]
    FileIO(String),

    /// Counter reached its largest value.
    #[error("Sequence exhausted: {0}")]
    Exhausted(String),

    /// Backend not available.
    #[error("Storage backend unavailable")]
    Unavailable,
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::FileIO(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias using `StorageError`.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::InvalidConfiguration("test".to_string()).error_code(),
            ErrorCode::INVALID_CONFIGURATION
        );
        assert_eq!(
            AppError::InvalidSellerReference(String::new()).error_code(),
            ErrorCode::INVALID_SELLER_REFERENCE
        );
        assert_eq!(
            AppError::Storage(StorageError::LockFailed("busy".to_string())).error_code(),
            ErrorCode::STORAGE_ERROR
        );
    }

    #[test]
    fn test_error_categories_follow_codes() {
        assert_eq!(
            AppError::InvalidConfiguration(String::new()).error_code().category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            AppError::InvalidSellerReference(String::new())
                .error_code()
                .category()
                .to_string(),
            "validation"
        );
        assert_eq!(
            AppError::Storage(StorageError::Unavailable).error_code().category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_exhausted_storage_error_maps_to_sequence_exhausted() {
        let err = AppError::from(StorageError::Exhausted("20240601".to_string()));
        assert!(matches!(err, AppError::SequenceExhausted(ref key) if key == "20240601"));
        assert_eq!(err.error_code(), ErrorCode::SEQUENCE_EXHAUSTED);

        let err = AppError::from(StorageError::FileIO("disk full".to_string()));
        assert!(matches!(err, AppError::Storage(_)));
    }
}
