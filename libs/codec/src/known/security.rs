//! Keys and signatures

use bytes::Bytes;
use types::{PublicKey, SignatureMetadata};

use crate::decoder::Decoder;
use crate::described::{decode_nullable, Decode, Described, EntryMode};
use crate::error::DecodeResult;
use crate::registry::TypeRegistry;
use crate::value::AnyValue;

/// Inner symbol every encoded public key carries
pub const PUBLIC_KEY_SYMBOL: &str = "net.corda:java.security.PublicKey";

impl Described for PublicKey {
    const DESCRIPTOR: &'static str = "java.security.PublicKey";
    const ENTRY: EntryMode = EntryMode::SelfDescribing;

    // described(symbol, binary X.509 encoding); the body is not a list
    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        decoder.expect_symbol(PUBLIC_KEY_SYMBOL)?;
        let x509_bits = Bytes::copy_from_slice(decoder.read_binary()?);
        decoder.finish_described()?;
        Ok(PublicKey { x509_bits })
    }
}

impl Described for SignatureMetadata {
    const DESCRIPTOR: &'static str = "net.corda.core.crypto.SignatureMetadata";

    fn construct(decoder: &mut Decoder<'_>, _registry: &TypeRegistry) -> DecodeResult<Self> {
        Ok(SignatureMetadata {
            platform_version: decoder.read_i32()?,
            scheme_number_id: decoder.read_i32()?,
        })
    }
}

/// Signature over a transaction id, with the signer's key
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSignature {
    pub bytes: Bytes,
    pub by: PublicKey,
    /// Present when only part of the transaction was signed; kept undecoded
    /// when its type is not registered
    pub partial_merkle_tree: Option<AnyValue>,
    pub signature_metadata: SignatureMetadata,
}

impl Described for TransactionSignature {
    const DESCRIPTOR: &'static str = "net.corda.core.crypto.TransactionSignature";

    fn construct(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self> {
        let bytes = Bytes::copy_from_slice(decoder.read_binary()?);
        let by = PublicKey::decode(decoder, registry)?;
        let partial_merkle_tree = decode_nullable::<AnyValue>(decoder, registry)?;
        let signature_metadata = SignatureMetadata::decode(decoder, registry)?;
        Ok(TransactionSignature {
            bytes,
            by,
            partial_merkle_tree,
            signature_metadata,
        })
    }
}
