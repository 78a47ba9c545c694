//! Error types for descriptor parsing and component-group validation

use thiserror::Error;

use crate::protocol::component::ComponentGroupEnum;

/// Errors raised while building a [`TypeDescriptor`](crate::TypeDescriptor) from text
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Fingerprint text is not base64 of the expected length
    #[error("Invalid fingerprint '{input}': {reason}")]
    InvalidFingerprint { input: String, reason: String },
}

impl DescriptorError {
    pub fn invalid_fingerprint(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFingerprint {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Component groups disagree with the fixed ordinal enumeration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComponentOrderError {
    /// Group index is not one of the enumerated ordinals
    #[error("Component group at position {position} has index {group_index}, which is not a known group ordinal")]
    UnknownGroup { position: usize, group_index: i32 },

    /// Group index is valid but the group sits at the wrong position
    #[error("Component group {found} found at position {position} (index {group_index}); group order must follow ordinals")]
    OutOfOrder {
        position: usize,
        group_index: i32,
        found: ComponentGroupEnum,
    },
}
