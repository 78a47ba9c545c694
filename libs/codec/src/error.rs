//! Decode errors for described-type processing
//!
//! Every variant carries enough context (expected vs actual token, byte
//! offset) to diagnose malformed input without replaying the bytes. Nested
//! failures are never wrapped: the outermost caller receives the innermost
//! cause unchanged.

use thiserror::Error;
use types::{ComponentOrderError, FormatCode, TypeDescriptor};

/// Decode errors with diagnostic context
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// No constructor is registered for the descriptor and the policy rejects unknown types
    #[error("Unknown descriptor {descriptor} at offset {offset}: no constructor registered")]
    UnknownDescriptor {
        descriptor: TypeDescriptor,
        offset: usize,
    },

    /// Wrong primitive kind, truncated input, or a composite boundary that does not line up
    #[error("Structural mismatch at offset {offset}: expected {expected}, found {actual} (context: {context})")]
    StructuralMismatch {
        expected: String,
        actual: String,
        offset: usize,
        context: String,
    },

    /// A self-validating type found a different inner descriptor than the one it requires
    #[error("Unexpected descriptor at offset {offset}: expected {expected}, found {actual}")]
    UnexpectedDescriptor {
        expected: String,
        actual: String,
        offset: usize,
    },

    /// Type is deliberately not decodable
    #[error("Unsupported type {type_name} at offset {offset}: {reason}")]
    UnsupportedType {
        type_name: String,
        reason: String,
        offset: usize,
    },

    /// Component groups are not at their ordinal positions
    #[error("Component order violated in transaction at offset {offset}: {source}")]
    ComponentOrder {
        source: ComponentOrderError,
        offset: usize,
    },

    /// Stream does not start with a usable serialisation preamble
    #[error("Invalid preamble at offset {offset}: {reason}")]
    InvalidPreamble { offset: usize, reason: String },

    /// Configured decode bound exceeded
    #[error("Limit exceeded at offset {offset}: {what} is {actual}, limit is {limit}")]
    LimitExceeded {
        what: &'static str,
        actual: usize,
        limit: usize,
        offset: usize,
    },
}

/// Fieldless discriminant of [`DecodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownDescriptor,
    StructuralMismatch,
    UnexpectedDescriptor,
    UnsupportedType,
    ComponentOrder,
    InvalidPreamble,
    LimitExceeded,
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnknownDescriptor { .. } => ErrorKind::UnknownDescriptor,
            DecodeError::StructuralMismatch { .. } => ErrorKind::StructuralMismatch,
            DecodeError::UnexpectedDescriptor { .. } => ErrorKind::UnexpectedDescriptor,
            DecodeError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            DecodeError::ComponentOrder { .. } => ErrorKind::ComponentOrder,
            DecodeError::InvalidPreamble { .. } => ErrorKind::InvalidPreamble,
            DecodeError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
        }
    }

    pub fn unknown_descriptor(descriptor: TypeDescriptor, offset: usize) -> Self {
        Self::UnknownDescriptor { descriptor, offset }
    }

    /// Create StructuralMismatch with free-form expected/actual text
    pub fn structural(
        expected: impl Into<String>,
        actual: impl Into<String>,
        offset: usize,
        context: impl Into<String>,
    ) -> Self {
        Self::StructuralMismatch {
            expected: expected.into(),
            actual: actual.into(),
            offset,
            context: context.into(),
        }
    }

    /// Create StructuralMismatch for a format code of the wrong kind
    pub fn wrong_format(expected: &str, code: u8, offset: usize) -> Self {
        let actual = match FormatCode::try_from(code) {
            Ok(format) => format.to_string(),
            Err(_) => format!("unassigned format code {code:#04x}"),
        };
        Self::structural(expected, actual, offset, "format code does not match field kind")
    }

    /// Create StructuralMismatch for input that ends inside a value
    pub fn truncated(what: &str, needed: usize, available: usize, offset: usize) -> Self {
        let context = if available == 0 {
            "input ends before value"
        } else {
            "value extends past its container or the end of input"
        };
        Self::structural(
            format!("{needed} bytes of {what}"),
            format!("{available} bytes"),
            offset,
            context,
        )
    }

    pub fn unexpected_descriptor(
        expected: impl Into<String>,
        actual: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::UnexpectedDescriptor {
            expected: expected.into(),
            actual: actual.into(),
            offset,
        }
    }

    pub fn unsupported(
        type_name: impl Into<String>,
        reason: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            reason: reason.into(),
            offset,
        }
    }

    /// Create ComponentOrder for the transaction composite starting at `offset`
    pub fn component_order(source: ComponentOrderError, offset: usize) -> Self {
        Self::ComponentOrder { source, offset }
    }

    pub fn invalid_preamble(offset: usize, reason: impl Into<String>) -> Self {
        Self::InvalidPreamble {
            offset,
            reason: reason.into(),
        }
    }

    pub fn limit_exceeded(what: &'static str, actual: usize, limit: usize, offset: usize) -> Self {
        Self::LimitExceeded {
            what,
            actual,
            limit,
            offset,
        }
    }

    /// Byte offset the error refers to
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::UnknownDescriptor { offset, .. }
            | DecodeError::StructuralMismatch { offset, .. }
            | DecodeError::UnexpectedDescriptor { offset, .. }
            | DecodeError::UnsupportedType { offset, .. }
            | DecodeError::ComponentOrder { offset, .. }
            | DecodeError::InvalidPreamble { offset, .. }
            | DecodeError::LimitExceeded { offset, .. } => Some(*offset),
        }
    }
}

/// Result type for decode operations
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
