//! # Known Type Decoding Tests
//!
//! End-to-end decoding of the standard types, including failure
//! propagation from a nested field to the outermost decode.

mod common;

use codec::{
    AnyValue, DecodeError, ErrorKind, SignedTransaction, TransactionSignature, TypeRegistry,
    BYTE_SEQUENCE_DESCRIPTOR,
};
use common::*;
use config::DecoderConfig;
use types::{ComponentGroup, ComponentGroupEnum, Instant, OpaqueBytes, PublicKey};

fn registry() -> TypeRegistry {
    TypeRegistry::with_builtins(DecoderConfig::default())
}

#[test]
fn test_instant_decodes() {
    let value = registry().decode_any(&instant(1_700_000_000, 500)).unwrap();
    let decoded = value.downcast_ref::<Instant>().expect("instant");
    assert_eq!(decoded.epoch_seconds, 1_700_000_000);
    assert_eq!(decoded.nanos, 500);
}

#[test]
fn test_instant_truncated_stream() {
    let mut bytes = instant(1_700_000_000, 500);
    // Drop the nanos field: int format code plus four bytes
    bytes.truncate(bytes.len() - 5);

    let err = registry().decode_any(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
}

#[test]
fn test_instant_missing_field_in_well_formed_list() {
    let bytes = composite(INSTANT, &[long(1_700_000_000)]);
    let err = registry().decode_root::<Instant>(&bytes).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
    assert!(err.to_string().contains("element count exhausted"));
}

#[test]
fn test_instant_wrong_field_kind() {
    let bytes = composite(INSTANT, &[int(5), int(500)]);
    match registry().decode_root::<Instant>(&bytes).unwrap_err() {
        DecodeError::StructuralMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, "long");
            assert_eq!(actual, "int (0x71)");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_instant_extra_field_rejected_on_exit() {
    let bytes = composite(INSTANT, &[long(1), int(2), int(3)]);
    let err = registry().decode_any(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
}

#[test]
fn test_public_key_via_dispatch() {
    let value = registry().decode_any(&public_key(&[0x30, 0x01])).unwrap();
    let key = value.downcast::<PublicKey>().expect("public key");
    assert_eq!(key.x509_bits.as_ref(), &[0x30, 0x01]);
}

#[test]
fn test_public_key_wrong_inner_symbol() {
    let bytes = public_key_with_symbol("net.corda:java.security.PrivateKey", &[0x30]);
    let err = registry().decode_root::<PublicKey>(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedDescriptor);
}

#[test]
fn test_public_key_requires_namespaced_inner_symbol() {
    // Normalises to the registered key, but the inner symbol must match exactly
    let bytes = public_key_with_symbol("java.security.PublicKey", &[0x30]);

    let err = registry().decode_root::<PublicKey>(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedDescriptor);
    assert_eq!(err.offset(), Some(0));

    let err = registry().decode_any(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedDescriptor);
}

#[test]
fn test_bad_public_key_fails_enclosing_decode() {
    let bad_key = public_key_with_symbol("net.corda:java.security.PrivateKey", &[0x30]);
    let sig = transaction_signature(bad_key, null());

    let err = registry()
        .decode_root::<TransactionSignature>(&sig)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedDescriptor);

    let tx = wire_transaction(&[0, 1]);
    let stream = preamble(envelope(signed_transaction(&[sig], &tx)));
    let err = registry().decode_any(&stream).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedDescriptor);
}

#[test]
fn test_throwable_unsupported() {
    let bytes = composite("net.corda:java.lang.Throwable", &[string("boom")]);
    let err = registry().decode_any(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert_eq!(err.offset(), Some(0));
}

#[test]
fn test_signed_transaction_end_to_end() {
    let registry = registry();
    let value = registry.decode_any(&sample_signed_transaction()).unwrap();
    let stx = value
        .downcast::<SignedTransaction>()
        .expect("signed transaction");

    assert_eq!(stx.sigs.len(), 1);
    assert_eq!(stx.sigs[0].signature_metadata.platform_version, 4);
    assert!(stx.sigs[0].partial_merkle_tree.is_none());
    assert_eq!(stx.signers().count(), 1);
    assert!(!stx.tx_bits.is_materialized());

    let wtx = stx.wire_transaction(&registry).unwrap();
    assert_eq!(wtx.ordinals(), vec![0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(wtx.privacy_salt().as_slice(), &[0x5a; 32]);
    assert_eq!(
        wtx.components(ComponentGroupEnum::Notary)[0].as_slice(),
        &[4, 0xaa]
    );
    assert!(stx.tx_bits.is_materialized());
}

#[test]
fn test_partial_merkle_tree_slot_captured() {
    let tree = composite("net.corda.core.crypto.PartialMerkleTree", &[binary(&[1, 2, 3])]);
    let sig = transaction_signature(public_key(&[0x30]), tree.clone());

    let decoded: TransactionSignature = registry().decode_root(&sig).unwrap();
    let slot = decoded.partial_merkle_tree.expect("tree present");
    let payload = slot.as_opaque().expect("captured");
    assert_eq!(payload.bytes().as_ref(), tree.as_slice());
}

#[test]
fn test_serialized_bytes_slot() {
    let registry = registry();
    let nested = instant(10, 20);
    let value = registry.decode_any(&serialized_bytes(&nested)).unwrap();
    assert!(matches!(value, AnyValue::Serialized(_)));
    assert_eq!(value.as_serialized().map(|s| s.bytes.as_ref()), Some(nested.as_slice()));

    let holder = value.into_holder::<Instant>().expect("deferred payload");
    assert_eq!(holder.materialize(&registry).unwrap(), &Instant::new(10, 20));
}

#[test]
fn test_privacy_salt_length_checked() {
    let bytes = composite(PRIVACY_SALT, &[binary(&[1; 16])]);
    let err = registry().decode_any(&bytes).unwrap_err();
    assert!(err.to_string().contains("32 byte salt"));
}

#[test]
fn test_byte_sequence_components_decode_as_opaque_bytes() {
    let registry = registry();
    let component = composite(BYTE_SEQUENCE_DESCRIPTOR, &[binary(&[9, 8, 7])]);
    let stream = composite(COMPONENT_GROUP, &[list(&[component.clone()]), int(2)]);

    let group: ComponentGroup = registry.decode_root(&stream).unwrap();
    assert_eq!(group.kind(), Some(ComponentGroupEnum::Commands));
    assert_eq!(group.components, vec![OpaqueBytes::new(vec![9u8, 8, 7])]);

    let value = registry.decode_any(&component).unwrap();
    assert_eq!(value.downcast_ref::<OpaqueBytes>().map(OpaqueBytes::as_slice), Some(&[9u8, 8, 7][..]));
}
