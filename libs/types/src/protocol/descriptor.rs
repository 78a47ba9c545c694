//! # Type Descriptors
//!
//! A described composite carries its descriptor immediately after the
//! described-type marker. On the wire a descriptor is either a symbol or a
//! ulong code. Symbols in the `net.corda:` namespace carry either a readable
//! type name (`net.corda:java.security.PublicKey`) or a base64 fingerprint of
//! the type's schema (`net.corda:pgT0Kc3t/bvnzmgu/nb4Cg==`).
//!
//! [`TypeDescriptor`] normalises all of these into one hashable key so a
//! registration written as `"java.security.PublicKey"` matches a stream
//! carrying `"net.corda:java.security.PublicKey"`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::constants::{CORDA_NAMESPACE, FINGERPRINT_LEN};
use crate::common::errors::DescriptorError;

/// Base64 text length of a padded 16-byte fingerprint
const FINGERPRINT_BASE64_LEN: usize = 24;

/// Key identifying which constructor decodes a composite
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeDescriptor {
    /// Readable type name, namespace stripped
    Symbol(String),
    /// Opaque fixed-length schema fingerprint
    Fingerprint([u8; FINGERPRINT_LEN]),
    /// Numeric AMQP descriptor
    Code(u64),
}

impl TypeDescriptor {
    /// Build a symbolic descriptor from a type name
    pub fn symbol(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix(CORDA_NAMESPACE) {
            Some(rest) => TypeDescriptor::Symbol(rest.to_owned()),
            None => TypeDescriptor::Symbol(name),
        }
    }

    /// Interpret a descriptor symbol exactly as it appears in a stream
    ///
    /// Namespaced symbols whose suffix is the base64 form of a 16-byte value
    /// become fingerprints; every other symbol stays symbolic.
    pub fn from_wire_symbol(raw: &str) -> Self {
        match raw.strip_prefix(CORDA_NAMESPACE) {
            Some(rest) => match decode_fingerprint(rest) {
                Ok(fingerprint) => TypeDescriptor::Fingerprint(fingerprint),
                Err(_) => TypeDescriptor::Symbol(rest.to_owned()),
            },
            None => TypeDescriptor::Symbol(raw.to_owned()),
        }
    }

    /// Build a fingerprint descriptor from its base64 text, with or without namespace
    pub fn fingerprint(encoded: &str) -> Result<Self, DescriptorError> {
        let encoded = encoded.strip_prefix(CORDA_NAMESPACE).unwrap_or(encoded);
        decode_fingerprint(encoded).map(TypeDescriptor::Fingerprint)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_fingerprint(&self) -> bool {
        matches!(self, TypeDescriptor::Fingerprint(_))
    }

    /// Symbol text this descriptor is written as in a stream, if it is symbolic
    pub fn to_wire_symbol(&self) -> Option<String> {
        match self {
            TypeDescriptor::Symbol(name) => Some(format!("{CORDA_NAMESPACE}{name}")),
            TypeDescriptor::Fingerprint(bytes) => {
                Some(format!("{CORDA_NAMESPACE}{}", STANDARD.encode(bytes)))
            }
            TypeDescriptor::Code(_) => None,
        }
    }
}

fn decode_fingerprint(encoded: &str) -> Result<[u8; FINGERPRINT_LEN], DescriptorError> {
    if encoded.len() != FINGERPRINT_BASE64_LEN {
        return Err(DescriptorError::invalid_fingerprint(
            encoded,
            format!(
                "expected {} base64 characters, got {}",
                FINGERPRINT_BASE64_LEN,
                encoded.len()
            ),
        ));
    }

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| DescriptorError::invalid_fingerprint(encoded, e.to_string()))?;

    <[u8; FINGERPRINT_LEN]>::try_from(decoded.as_slice()).map_err(|_| {
        DescriptorError::invalid_fingerprint(
            encoded,
            format!("decodes to {} bytes, expected {}", decoded.len(), FINGERPRINT_LEN),
        )
    })
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Symbol(name) => f.write_str(name),
            TypeDescriptor::Fingerprint(bytes) => {
                write!(f, "{CORDA_NAMESPACE}{}", STANDARD.encode(bytes))
            }
            TypeDescriptor::Code(code) => write!(f, "{code:#018x}"),
        }
    }
}

impl From<&str> for TypeDescriptor {
    fn from(raw: &str) -> Self {
        TypeDescriptor::from_wire_symbol(raw)
    }
}

impl From<String> for TypeDescriptor {
    fn from(raw: String) -> Self {
        TypeDescriptor::from_wire_symbol(&raw)
    }
}

impl From<u64> for TypeDescriptor {
    fn from(code: u64) -> Self {
        TypeDescriptor::Code(code)
    }
}
