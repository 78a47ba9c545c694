//! Deferred decoding of nested serialised payloads
//!
//! A [`GenericHolder`] keeps the raw bytes of a nested stream and interprets
//! them as `T` only when asked. The first successful interpretation is
//! cached; later calls return the cached value without parsing. Failures are
//! not cached, so a later call with a better-equipped registry can succeed.

use bytes::Bytes;
use once_cell::sync::OnceCell;
use tracing::trace;
use types::SerializedBytes;

use crate::described::Decode;
use crate::error::DecodeResult;
use crate::registry::TypeRegistry;
use crate::value::{AnyValue, OpaquePayload};

/// Captured bytes plus a lazily decoded `T`
#[derive(Debug, Clone)]
pub struct GenericHolder<T> {
    bytes: Bytes,
    cache: OnceCell<T>,
}

impl<T> GenericHolder<T> {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            cache: OnceCell::new(),
        }
    }

    pub fn from_serialized(serialized: SerializedBytes) -> Self {
        Self::new(serialized.bytes)
    }

    pub fn from_opaque(payload: &OpaquePayload) -> Self {
        Self::new(payload.bytes().clone())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_materialized(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Cached value, if already materialised
    pub fn get(&self) -> Option<&T> {
        self.cache.get()
    }

    pub fn into_inner(self) -> Option<T> {
        self.cache.into_inner()
    }
}

impl<T: Decode> GenericHolder<T> {
    /// Interpret the bytes as `T`, once
    pub fn materialize(&self, registry: &TypeRegistry) -> DecodeResult<&T> {
        self.cache.get_or_try_init(|| {
            trace!(
                len = self.bytes.len(),
                target = std::any::type_name::<T>(),
                "Materializing nested payload"
            );
            registry.decode_root::<T>(&self.bytes)
        })
    }
}

impl<T> PartialEq for GenericHolder<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl AnyValue {
    /// Wrap a deferred payload for later interpretation as `T`
    pub fn into_holder<T>(self) -> Option<GenericHolder<T>> {
        match self {
            AnyValue::Serialized(serialized) => Some(GenericHolder::from_serialized(serialized)),
            AnyValue::Opaque(payload) => Some(GenericHolder::from_opaque(&payload)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::DecoderConfig;
    use hex_literal::hex;
    use types::Instant;

    // described(sym "net.corda:java.time.Instant", list8[smalllong 9, smallint 1])
    const INSTANT: [u8; 37] = hex!(
        "00 a3 1b 6e 65 74 2e 63 6f 72 64 61 3a 6a 61 76 61 2e 74 69 6d 65 2e 49 6e 73 74 61 6e 74"
        "c0 05 02 55 09 54 01"
    );

    #[test]
    fn test_materialize_caches() {
        let registry = TypeRegistry::with_builtins(DecoderConfig::default());
        let holder: GenericHolder<Instant> = GenericHolder::new(INSTANT.to_vec());
        assert!(!holder.is_materialized());

        let first = holder.materialize(&registry).unwrap();
        assert_eq!(*first, Instant::new(9, 1));
        assert!(holder.is_materialized());
        assert!(std::ptr::eq(first, holder.materialize(&registry).unwrap()));
    }

    #[test]
    fn test_failure_not_cached() {
        let registry = TypeRegistry::with_builtins(DecoderConfig::default());
        let holder: GenericHolder<Instant> = GenericHolder::new(INSTANT[..20].to_vec());
        assert!(holder.materialize(&registry).is_err());
        assert!(!holder.is_materialized());
        assert!(holder.get().is_none());
    }

    #[test]
    fn test_equality_by_bytes() {
        let a: GenericHolder<Instant> = GenericHolder::new(INSTANT.to_vec());
        let b: GenericHolder<Instant> = GenericHolder::new(INSTANT.to_vec());
        let registry = TypeRegistry::with_builtins(DecoderConfig::default());
        a.materialize(&registry).unwrap();
        assert_eq!(a, b);
    }
}
