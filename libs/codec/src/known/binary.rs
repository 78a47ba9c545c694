//! Byte-carrying values

use bytes::Bytes;
use types::{OpaqueBytes, PrivacySalt, SerializedBytes};

use crate::decoder::Decoder;
use crate::described::Described;
use crate::error::{DecodeError, DecodeResult};
use crate::registry::TypeRegistry;

/// Schema fingerprint of a byte window; same wire layout as [`OpaqueBytes`]
pub const BYTE_SEQUENCE_DESCRIPTOR: &str = "net.corda:0UvJuq940P0jrySmql4EPg==";

impl Described for OpaqueBytes {
    // Registered by schema fingerprint; the wire never names this type
    const DESCRIPTOR: &'static str = "net.corda:pgT0Kc3t/bvnzmgu/nb4Cg==";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(OpaqueBytes::new(Bytes::copy_from_slice(decoder.read_binary()?)))
    }
}

impl Described for SerializedBytes {
    const DESCRIPTOR: &'static str = "net.corda.core.serialization.SerializedBytes";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(SerializedBytes {
            bytes: Bytes::copy_from_slice(decoder.read_binary()?),
        })
    }
}

impl Described for PrivacySalt {
    const DESCRIPTOR: &'static str = "net.corda.core.contracts.PrivacySalt";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        let offset = decoder.position();
        let salt = decoder.read_binary()?;
        if salt.len() != PrivacySalt::LEN {
            return Err(DecodeError::structural(
                format!("{} byte salt", PrivacySalt::LEN),
                format!("{} bytes", salt.len()),
                offset,
                "PrivacySalt",
            ));
        }
        Ok(PrivacySalt(Bytes::copy_from_slice(salt)))
    }
}
