//! Standard value types
//!
//! Plain data for the standard types every stream may contain. These structs
//! know nothing about the wire; their decoders live in the codec crate.

use bytes::Bytes;

/// Point on the UTC time-line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Instant {
    pub epoch_seconds: i64,
    pub nanos: i32,
}

impl Instant {
    pub fn new(epoch_seconds: i64, nanos: i32) -> Self {
        Self {
            epoch_seconds,
            nanos,
        }
    }

    /// Nanoseconds since the Unix epoch
    pub fn as_unix_nanos(&self) -> i128 {
        i128::from(self.epoch_seconds) * 1_000_000_000 + i128::from(self.nanos)
    }
}

/// Calendar date without time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LocalDate {
    pub year: u32,
    pub month: u8,
    pub day: u8,
}

/// Time-based amount of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Duration {
    pub seconds: u64,
    pub nanos: u32,
}

impl From<Duration> for std::time::Duration {
    fn from(d: Duration) -> Self {
        std::time::Duration::new(d.seconds, d.nanos)
    }
}

/// ISO 4217 currency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Currency {
    pub code: String,
}

/// Reference to a class by its fully qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClassName {
    pub name: String,
}

/// Public key as its X.509 `SubjectPublicKeyInfo` encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PublicKey {
    pub x509_bits: Bytes,
}

/// Immutable byte sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OpaqueBytes(pub Bytes);

impl OpaqueBytes {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for OpaqueBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Random salt mixed into every component hash of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PrivacySalt(pub Bytes);

impl PrivacySalt {
    /// Required salt length in bytes
    pub const LEN: usize = 32;

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// A nested serialised stream whose element type the wire does not name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SerializedBytes {
    pub bytes: Bytes,
}

/// Platform and scheme a transaction signature was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignatureMetadata {
    pub platform_version: i32,
    pub scheme_number_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_unix_nanos() {
        let instant = Instant::new(1_700_000_000, 500);
        assert_eq!(instant.as_unix_nanos(), 1_700_000_000_000_000_500);

        let before_epoch = Instant::new(-1, 0);
        assert_eq!(before_epoch.as_unix_nanos(), -1_000_000_000);
    }

    #[test]
    fn test_duration_conversion() {
        let d = Duration {
            seconds: 90,
            nanos: 5,
        };
        assert_eq!(std::time::Duration::from(d), std::time::Duration::new(90, 5));
    }

    #[test]
    fn test_opaque_bytes_accessors() {
        let bytes = OpaqueBytes::new(vec![1u8, 2, 3]);
        assert_eq!(bytes.len(), 3);
        assert!(!bytes.is_empty());
        assert_eq!(bytes.as_slice(), &[1, 2, 3]);
        assert!(OpaqueBytes::default().is_empty());
    }
}
