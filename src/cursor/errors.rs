//! Cursor error types
//!
//! Error codes:
//! - RANGE_KEYSET_NOT_SUPPORTED
//! - RANGE_DIRECTION_CHANGED
//! - RANGE_INVALID_RANGE
//! - RANGE_INVALID_SEEK
//! - RANGE_FILTER_FAILED

use std::fmt;

/// Cursor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorErrorCode {
    /// Keyset resume requested where it is not implemented
    KeysetNotSupported,
    /// Enumeration direction switched without a reset
    DirectionChanged,
    /// Range descriptors do not match the index fields
    InvalidRange,
    /// Seek parameters do not form a prefix of the index key
    InvalidSeek,
    /// A filter failed while being evaluated
    FilterFailed,
}

impl CursorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CursorErrorCode::KeysetNotSupported => "RANGE_KEYSET_NOT_SUPPORTED",
            CursorErrorCode::DirectionChanged => "RANGE_DIRECTION_CHANGED",
            CursorErrorCode::InvalidRange => "RANGE_INVALID_RANGE",
            CursorErrorCode::InvalidSeek => "RANGE_INVALID_SEEK",
            CursorErrorCode::FilterFailed => "RANGE_FILTER_FAILED",
        }
    }
}

impl fmt::Display for CursorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Cursor error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorError {
    code: CursorErrorCode,
    message: String,
}

impl CursorError {
    /// Keyset resume is not available for this cursor shape
    pub fn keyset_not_supported(reason: impl Into<String>) -> Self {
        Self {
            code: CursorErrorCode::KeysetNotSupported,
            message: reason.into(),
        }
    }

    /// Direction switched mid-enumeration
    pub fn direction_changed() -> Self {
        Self {
            code: CursorErrorCode::DirectionChanged,
            message: "Enumeration direction can only change after reset".to_string(),
        }
    }

    /// Range descriptors are inconsistent with the index
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self {
            code: CursorErrorCode::InvalidRange,
            message: reason.into(),
        }
    }

    /// Seek parameters are inconsistent with the index
    pub fn invalid_seek(reason: impl Into<String>) -> Self {
        Self {
            code: CursorErrorCode::InvalidSeek,
            message: reason.into(),
        }
    }

    /// A filter could not be evaluated
    pub fn filter_failed(reason: impl Into<String>) -> Self {
        Self {
            code: CursorErrorCode::FilterFailed,
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CursorErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CursorError {}

/// Result type for cursor operations
pub type CursorResult<T> = Result<T, CursorError>;
