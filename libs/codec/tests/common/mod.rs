//! Common Test Utilities for the envelope codec
//!
//! Encoders for the AMQP values the decoder reads, plus builders for the
//! standard composites. Every function returns a complete encoded value so
//! fixtures compose by nesting calls.

#![allow(dead_code)]

use types::{ENVELOPE_DESCRIPTOR, SERIALIZATION_MAGIC};

pub const INSTANT: &str = "net.corda:java.time.Instant";
pub const PUBLIC_KEY: &str = "net.corda:java.security.PublicKey";
pub const OPAQUE_BYTES: &str = "net.corda:pgT0Kc3t/bvnzmgu/nb4Cg==";
pub const SERIALIZED_BYTES: &str = "net.corda:net.corda.core.serialization.SerializedBytes";
pub const PRIVACY_SALT: &str = "net.corda:net.corda.core.contracts.PrivacySalt";
pub const COMPONENT_GROUP: &str = "net.corda:net.corda.core.transactions.ComponentGroup";
pub const WIRE_TRANSACTION: &str = "net.corda:net.corda.core.transactions.WireTransaction";
pub const SIGNATURE_METADATA: &str = "net.corda:net.corda.core.crypto.SignatureMetadata";
pub const TRANSACTION_SIGNATURE: &str = "net.corda:net.corda.core.crypto.TransactionSignature";
pub const SIGNED_TRANSACTION: &str = "net.corda:net.corda.core.transactions.SignedTransaction";

// ----------------------------------------------------------------------
// Primitives
// ----------------------------------------------------------------------

pub fn null() -> Vec<u8> {
    vec![0x40]
}

pub fn long(value: i64) -> Vec<u8> {
    let mut out = vec![0x81];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn int(value: i32) -> Vec<u8> {
    let mut out = vec![0x71];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn uint(value: u32) -> Vec<u8> {
    let mut out = vec![0x70];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn ulong(value: u64) -> Vec<u8> {
    let mut out = vec![0x80];
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn ubyte(value: u8) -> Vec<u8> {
    vec![0x50, value]
}

fn variable(short: u8, long: u8, bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 5);
    if bytes.len() <= u8::MAX as usize {
        out.push(short);
        out.push(bytes.len() as u8);
    } else {
        out.push(long);
        out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    }
    out.extend_from_slice(bytes);
    out
}

pub fn binary(bytes: &[u8]) -> Vec<u8> {
    variable(0xa0, 0xb0, bytes)
}

pub fn string(value: &str) -> Vec<u8> {
    variable(0xa1, 0xb1, value.as_bytes())
}

pub fn symbol(value: &str) -> Vec<u8> {
    variable(0xa3, 0xb3, value.as_bytes())
}

// ----------------------------------------------------------------------
// Containers
// ----------------------------------------------------------------------

pub fn list(items: &[Vec<u8>]) -> Vec<u8> {
    if items.is_empty() {
        return vec![0x45];
    }
    let body: Vec<u8> = items.concat();
    let mut out = Vec::with_capacity(body.len() + 9);
    if body.len() + 1 <= u8::MAX as usize && items.len() <= u8::MAX as usize {
        out.push(0xc0);
        out.push((body.len() + 1) as u8);
        out.push(items.len() as u8);
    } else {
        out.push(0xd0);
        out.extend_from_slice(&((body.len() + 4) as u32).to_be_bytes());
        out.extend_from_slice(&(items.len() as u32).to_be_bytes());
    }
    out.extend_from_slice(&body);
    out
}

pub fn described(descriptor: &str, body: Vec<u8>) -> Vec<u8> {
    let mut out = vec![0x00];
    out.extend(symbol(descriptor));
    out.extend(body);
    out
}

/// Described list: the shape of every dispatched composite
pub fn composite(descriptor: &str, fields: &[Vec<u8>]) -> Vec<u8> {
    described(descriptor, list(fields))
}

pub fn composite_code(code: u64, fields: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x00];
    out.extend(ulong(code));
    out.extend(list(fields));
    out
}

// ----------------------------------------------------------------------
// Framing
// ----------------------------------------------------------------------

pub fn preamble(body: Vec<u8>) -> Vec<u8> {
    let mut out = SERIALIZATION_MAGIC.to_vec();
    out.push(0);
    out.extend(body);
    out
}

/// Envelope around `object` with placeholder schema and transforms
pub fn envelope(object: Vec<u8>) -> Vec<u8> {
    composite_code(
        ENVELOPE_DESCRIPTOR,
        &[object, list(&[list(&[string("schema")])]), list(&[])],
    )
}

// ----------------------------------------------------------------------
// Standard composites
// ----------------------------------------------------------------------

pub fn instant(epoch_seconds: i64, nanos: i32) -> Vec<u8> {
    composite(INSTANT, &[long(epoch_seconds), int(nanos)])
}

pub fn public_key_with_symbol(inner_symbol: &str, x509: &[u8]) -> Vec<u8> {
    described(inner_symbol, binary(x509))
}

pub fn public_key(x509: &[u8]) -> Vec<u8> {
    public_key_with_symbol(PUBLIC_KEY, x509)
}

pub fn opaque_bytes(bytes: &[u8]) -> Vec<u8> {
    composite(OPAQUE_BYTES, &[binary(bytes)])
}

pub fn serialized_bytes(stream: &[u8]) -> Vec<u8> {
    composite(SERIALIZED_BYTES, &[binary(stream)])
}

pub fn privacy_salt(fill: u8) -> Vec<u8> {
    composite(PRIVACY_SALT, &[binary(&[fill; 32])])
}

pub fn component_group(group_index: i32, components: &[&[u8]]) -> Vec<u8> {
    let components: Vec<Vec<u8>> = components.iter().map(|c| opaque_bytes(c)).collect();
    composite(COMPONENT_GROUP, &[list(&components), int(group_index)])
}

/// Wire transaction with one component per listed group index
pub fn wire_transaction(group_indices: &[i32]) -> Vec<u8> {
    let groups: Vec<Vec<u8>> = group_indices
        .iter()
        .map(|&index| {
            let component: &[u8] = &[index as u8, 0xaa];
            component_group(index, &[component])
        })
        .collect();
    composite(WIRE_TRANSACTION, &[list(&groups), privacy_salt(0x5a)])
}

pub fn signature_metadata(platform_version: i32, scheme_number_id: i32) -> Vec<u8> {
    composite(
        SIGNATURE_METADATA,
        &[int(platform_version), int(scheme_number_id)],
    )
}

pub fn transaction_signature(key: Vec<u8>, partial_tree: Vec<u8>) -> Vec<u8> {
    composite(
        TRANSACTION_SIGNATURE,
        &[
            binary(&[0x51; 64]),
            key,
            partial_tree,
            signature_metadata(4, 4),
        ],
    )
}

pub fn signed_transaction(sigs: &[Vec<u8>], tx_stream: &[u8]) -> Vec<u8> {
    composite(
        SIGNED_TRANSACTION,
        &[list(sigs), serialized_bytes(tx_stream)],
    )
}

/// Complete signed transaction stream: preamble, one signature, all eight groups
pub fn sample_signed_transaction() -> Vec<u8> {
    let tx = preamble(envelope(wire_transaction(&[0, 1, 2, 3, 4, 5, 6, 7])));
    let sig = transaction_signature(public_key(&[0x30, 0x2a, 0x30, 0x05]), null());
    preamble(envelope(signed_transaction(&[sig], &tx)))
}
