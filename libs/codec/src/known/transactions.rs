//! Transaction structures

use tracing::trace;
use types::{ComponentGroup, OpaqueBytes, PrivacySalt, PublicKey, SerializedBytes, WireTransaction};

use crate::decoder::Decoder;
use crate::described::{decode_list, Decode, Described};
use crate::error::{DecodeError, DecodeResult};
use crate::generic::GenericHolder;
use crate::known::security::TransactionSignature;
use crate::registry::TypeRegistry;

impl Described for ComponentGroup {
    const DESCRIPTOR: &'static str = "net.corda.core.transactions.ComponentGroup";

    fn construct(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self> {
        let components = decode_list::<OpaqueBytes>(decoder, registry)?;
        let group_index = decoder.read_i32()?;
        Ok(ComponentGroup::new(group_index, components))
    }
}

impl Described for WireTransaction {
    const DESCRIPTOR: &'static str = "net.corda.core.transactions.WireTransaction";

    fn construct(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self> {
        // Offset of the group list; the composite marker itself is already consumed
        let offset = decoder.position();
        let groups = decode_list::<ComponentGroup>(decoder, registry)?;
        let privacy_salt = PrivacySalt::decode(decoder, registry)?;
        trace!(groups = groups.len(), "Decoded component groups");
        WireTransaction::new(groups, privacy_salt)
            .map_err(|source| DecodeError::component_order(source, offset))
    }
}

/// Signatures plus the serialised transaction they sign
///
/// The transaction stays serialised until [`SignedTransaction::wire_transaction`]
/// is called; signature checks work on the raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub sigs: Vec<TransactionSignature>,
    pub tx_bits: GenericHolder<WireTransaction>,
}

impl SignedTransaction {
    /// Decode the signed transaction body, once
    pub fn wire_transaction(&self, registry: &TypeRegistry) -> DecodeResult<&WireTransaction> {
        self.tx_bits.materialize(registry)
    }

    pub fn signers(&self) -> impl Iterator<Item = &PublicKey> {
        self.sigs.iter().map(|sig| &sig.by)
    }
}

impl Described for SignedTransaction {
    const DESCRIPTOR: &'static str = "net.corda.core.transactions.SignedTransaction";

    fn construct(decoder: &mut Decoder<'_>, registry: &TypeRegistry) -> DecodeResult<Self> {
        let sigs = decode_list::<TransactionSignature>(decoder, registry)?;
        let tx_bits = SerializedBytes::decode(decoder, registry)?;
        Ok(SignedTransaction {
            sigs,
            tx_bits: GenericHolder::from_serialized(tx_bits),
        })
    }
}
